//! End-to-end party flows driven through the registry.
//!
//! Each test plays a whole game the way the transport would: one event at
//! a time, inspecting the dispatches that come back.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]

use std::collections::BTreeSet;

use chowvote_core::{Dispatch, Party, PartyRegistry, Recipient, SequenceCodes};
use chowvote_types::{ClientEvent, ConnectionId, PartyCode, Phase, ServerEvent};

struct Table {
    reg: PartyRegistry,
    code: PartyCode,
}

impl Table {
    /// Create a party hosted by `host` and seat every guest.
    fn open(host: (ConnectionId, &str), guests: &[(ConnectionId, &str)]) -> Self {
        let mut reg = PartyRegistry::new().with_code_source(SequenceCodes::new(["FOOD"]));
        reg.handle(host.0, ClientEvent::CreateParty { name: host.1.into() });
        let code = PartyCode::from("FOOD");
        for (conn, name) in guests {
            reg.handle(*conn, ClientEvent::JoinParty { code: code.clone(), name: (*name).into() });
        }
        Self { reg, code }
    }

    fn send(&mut self, conn: ConnectionId, event: impl FnOnce(PartyCode) -> ClientEvent) -> Vec<Dispatch> {
        self.reg.handle(conn, event(self.code.clone()))
    }

    fn party(&self) -> &Party {
        self.reg.party(&self.code).unwrap()
    }

    fn vote(&mut self, conn: ConnectionId, liked: &[&str]) -> Vec<Dispatch> {
        let liked: Vec<String> = liked.iter().map(|s| (*s).to_owned()).collect();
        self.send(conn, |code| ClientEvent::SubmitVote { code, liked })
    }
}

fn only_event(dispatches: &[Dispatch]) -> (&Recipient, &ServerEvent) {
    assert_eq!(dispatches.len(), 1, "expected one dispatch, got {dispatches:?}");
    match &dispatches[0] {
        Dispatch::Send { recipient, event } => (recipient, event),
        other => panic!("expected a send, got {other:?}"),
    }
}

#[test]
fn full_game_reaches_a_winner() {
    let (ada, bob, cy) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
    let mut table = Table::open((ada, "Ada"), &[(bob, "Bob"), (cy, "Cy")]);

    table.send(ada, |code| ClientEvent::StartAdding { code });
    for (conn, place) in [(ada, "Pho 99"), (bob, "Taco Hut"), (cy, "Curry House")] {
        table.send(conn, |code| ClientEvent::AddRestaurant { code, restaurant: place.into() });
    }
    let out = table.send(bob, |code| ClientEvent::BeginSelection { code });
    let (recipient, event) = only_event(&out);
    assert_eq!(recipient, &Recipient::Room(PartyCode::from("FOOD")));
    assert_eq!(
        event,
        &ServerEvent::VotingPhase {
            restaurants: vec!["Pho 99".into(), "Taco Hut".into(), "Curry House".into()],
        }
    );

    assert_eq!(
        only_event(&table.vote(ada, &["Pho 99", "Taco Hut"])).1,
        &ServerEvent::WaitingForOthers {}
    );
    assert_eq!(
        only_event(&table.vote(bob, &["Taco Hut"])).1,
        &ServerEvent::WaitingForOthers {}
    );
    let out = table.vote(cy, &["Curry House", "Taco Hut"]);
    assert_eq!(
        only_event(&out).1,
        &ServerEvent::Winner {
            restaurant: Some("Taco Hut".into()),
            votes: 3,
        }
    );
    assert_eq!(table.party().phase(), Phase::Results);
}

#[test]
fn tie_break_follows_ballot_order() {
    // A likes {x, y}, B likes {y}, C likes {x}: x and y both get 2. Ballots
    // are counted in first-submission order and names in submitted order,
    // so the first name counted with the top score wins.
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
    let mut table = Table::open((a, "A"), &[(b, "B"), (c, "C")]);
    table.send(a, |code| ClientEvent::BeginSelection { code });

    table.vote(a, &["x", "y"]);
    table.vote(b, &["y"]);
    let out = table.vote(c, &["x"]);

    let tally = table.party().tally();
    assert_eq!(tally.count("x"), 2);
    assert_eq!(tally.count("y"), 2);
    assert_eq!(
        tally.counts().iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
        vec!["x", "y"]
    );
    assert_eq!(
        only_event(&out).1,
        &ServerEvent::Winner {
            restaurant: Some("x".into()),
            votes: 2,
        }
    );
}

#[test]
fn one_missing_vote_keeps_voting_open() {
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
    let mut table = Table::open((a, "A"), &[(b, "B"), (c, "C")]);
    table.send(a, |code| ClientEvent::BeginSelection { code });

    table.vote(a, &["x"]);
    table.vote(b, &["x"]);
    // Re-voting does not count as a new voter.
    let out = table.vote(b, &["y"]);
    assert_eq!(only_event(&out).1, &ServerEvent::WaitingForOthers {});
    assert_eq!(table.party().phase(), Phase::Voting);
    assert_eq!(table.party().ballots().len(), 2);
}

#[test]
fn voter_who_leaves_still_counts() {
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
    let mut table = Table::open((a, "A"), &[(b, "B"), (c, "C")]);
    table.send(a, |code| ClientEvent::BeginSelection { code });

    table.vote(c, &["Pho"]);
    table.reg.disconnect(c);
    assert_eq!(table.party().member_names(), vec!["A", "B"]);

    // C's ballot and A's make two, matching the two remaining members.
    let out = table.vote(a, &["Pho", "Sushi"]);
    assert_eq!(
        only_event(&out).1,
        &ServerEvent::Winner {
            restaurant: Some("Pho".into()),
            votes: 2,
        }
    );
    assert_eq!(table.party().phase(), Phase::Results);
}

#[test]
fn non_voter_leaving_waits_for_next_ballot() {
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
    let mut table = Table::open((a, "A"), &[(b, "B"), (c, "C")]);
    table.send(a, |code| ClientEvent::BeginSelection { code });
    table.vote(a, &["x"]);
    table.vote(b, &["y"]);

    // Leaving never finishes the vote on its own.
    let out = table.reg.disconnect(c);
    assert!(matches!(only_event(&out).1, ServerEvent::PartyUpdated { .. }));
    assert_eq!(table.party().phase(), Phase::Voting);

    // The next ballot (here a re-vote) sees two ballots for two members.
    let out = table.vote(b, &["x"]);
    assert_eq!(
        only_event(&out).1,
        &ServerEvent::Winner {
            restaurant: Some("x".into()),
            votes: 2,
        }
    );
}

#[test]
fn departed_ballots_outnumbering_members_keep_voting_open() {
    let ids: Vec<ConnectionId> = (0..4).map(|_| ConnectionId::new()).collect();
    let mut table = Table::open((ids[0], "A"), &[(ids[1], "B"), (ids[2], "C"), (ids[3], "D")]);
    table.send(ids[0], |code| ClientEvent::BeginSelection { code });
    table.vote(ids[2], &["x"]);
    table.vote(ids[3], &["x"]);
    table.reg.disconnect(ids[2]);
    table.reg.disconnect(ids[3]);

    // Completion needs the ballot count to equal the member count; a third
    // ballot for two members overshoots it.
    let out = table.vote(ids[1], &["y"]);
    assert!(matches!(only_event(&out).1, ServerEvent::WaitingForOthers {}));
    assert_eq!(table.party().ballots().len(), 3);
    assert_eq!(table.party().phase(), Phase::Voting);
}

#[test]
fn rejoining_under_same_name_keeps_ballot() {
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
    let mut table = Table::open((a, "A"), &[(b, "B"), (c, "C")]);
    table.send(a, |code| ClientEvent::BeginSelection { code });
    table.vote(b, &["x"]);

    // B reconnects on a new socket.
    let b2 = ConnectionId::new();
    let out = table.send(b2, |code| ClientEvent::JoinParty { code, name: "B".into() });
    assert!(matches!(
        out.last(),
        Some(Dispatch::Send {
            recipient: Recipient::Connection(conn),
            event: ServerEvent::VotingPhase { .. },
        }) if *conn == b2
    ));
    assert!(!table.party().has_member(b));
    assert_eq!(table.party().member_names(), vec!["A", "C", "B"]);

    // The stale socket can no longer act.
    let out = table.vote(b, &["y"]);
    assert!(matches!(only_event(&out).1, ServerEvent::Error { .. }));

    table.vote(a, &["x"]);
    let out = table.vote(c, &["z"]);
    assert_eq!(
        only_event(&out).1,
        &ServerEvent::Winner {
            restaurant: Some("x".into()),
            votes: 2,
        }
    );
}

#[test]
fn joining_after_results_reports_the_winner() {
    let (a, b) = (ConnectionId::new(), ConnectionId::new());
    let mut table = Table::open((a, "A"), &[]);
    table.send(a, |code| ClientEvent::BeginSelection { code });
    table.vote(a, &["Pho"]);
    assert_eq!(table.party().phase(), Phase::Results);

    let out = table.send(b, |code| ClientEvent::JoinParty { code, name: "B".into() });
    assert_eq!(
        out.last(),
        Some(&Dispatch::to_conn(
            b,
            ServerEvent::Winner {
                restaurant: Some("Pho".into()),
                votes: 1,
            }
        ))
    );
}

#[test]
fn empty_ballots_produce_no_winner() {
    let (a, b) = (ConnectionId::new(), ConnectionId::new());
    let mut table = Table::open((a, "A"), &[(b, "B")]);
    table.send(a, |code| ClientEvent::BeginSelection { code });
    table.vote(a, &[]);
    let out = table.vote(b, &[]);
    assert_eq!(
        only_event(&out).1,
        &ServerEvent::Winner {
            restaurant: None,
            votes: 0,
        }
    );
}

#[test]
fn add_then_remove_restores_list() {
    let (a, b) = (ConnectionId::new(), ConnectionId::new());
    let mut table = Table::open((a, "A"), &[(b, "B")]);
    table.send(a, |code| ClientEvent::StartAdding { code });
    table.send(a, |code| ClientEvent::AddRestaurant { code, restaurant: "Pho".into() });
    let before = table.party().restaurants().to_vec();

    table.send(b, |code| ClientEvent::AddRestaurant { code, restaurant: "Sushi".into() });
    table.send(b, |code| ClientEvent::RemoveRestaurant { code, restaurant: "Sushi".into() });
    assert_eq!(table.party().restaurants(), before.as_slice());

    table.send(b, |code| ClientEvent::RemoveRestaurant { code, restaurant: "Pho".into() });
    assert_eq!(table.party().restaurants(), before.as_slice());
}

#[test]
fn host_disconnect_ends_the_party() {
    let (a, b) = (ConnectionId::new(), ConnectionId::new());
    let mut table = Table::open((a, "A"), &[(b, "B")]);

    let out = table.reg.disconnect(a);
    assert!(matches!(
        &out[0],
        Dispatch::Send {
            event: ServerEvent::HostLeft { .. },
            ..
        }
    ));
    assert!(table.reg.is_empty());

    let late = ConnectionId::new();
    let out = table.send(late, |code| ClientEvent::JoinParty { code, name: "C".into() });
    assert_eq!(only_event(&out).1, &ServerEvent::error("Party not found"));
}

#[test]
fn member_disconnect_leaves_party_intact() {
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
    let mut table = Table::open((a, "A"), &[(b, "B"), (c, "C")]);

    let out = table.reg.disconnect(b);
    assert_eq!(
        only_event(&out).1,
        &ServerEvent::PartyUpdated {
            host: "A".into(),
            members: vec!["A".into(), "C".into()],
        }
    );
    assert_eq!(table.party().member_names(), vec!["A", "C"]);
}

#[test]
fn live_codes_are_unique() {
    let mut reg = PartyRegistry::new();
    let mut seen = BTreeSet::new();
    for i in 0..300 {
        let host = ConnectionId::new();
        let out = reg.handle(host, ClientEvent::CreateParty { name: format!("host{i}") });
        let Some(ServerEvent::PartyCreated { code, host: name, members }) =
            out.iter().find_map(Dispatch::event)
        else {
            panic!("no party_created in {out:?}");
        };
        assert!(code.is_well_formed());
        assert_eq!(members, &vec![name.clone()]);
        assert!(seen.insert(code.clone()), "duplicate code {code}");
        assert_eq!(reg.party(code).and_then(|p| p.name_of(host)), Some(name.as_str()));
    }
    assert_eq!(reg.len(), 300);
}
