//! Plurality tally over liked sets.
//!
//! Every ballot adds one to each restaurant it likes. The winner is the
//! restaurant with the highest count. Ties go to the restaurant that was
//! counted first, where counting walks ballots in the order they were
//! first submitted and names within a ballot in the order the client sent
//! them. A name repeated inside one ballot counts once.

/// Per-restaurant like counts in first-counted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: Vec<(String, u32)>,
}

impl Tally {
    /// Count a sequence of ballots.
    pub fn from_ballots<'a, I>(ballots: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut tally = Self::default();
        for ballot in ballots {
            tally.add_ballot(ballot);
        }
        tally
    }

    /// Add one ballot's likes.
    pub fn add_ballot(&mut self, liked: &[String]) {
        for (idx, name) in liked.iter().enumerate() {
            if liked.iter().take(idx).any(|earlier| earlier == name) {
                continue;
            }
            match self.counts.iter_mut().find(|(counted, _)| counted == name) {
                Some((_, count)) => *count = count.saturating_add(1),
                None => self.counts.push((name.clone(), 1)),
            }
        }
    }

    /// Like count for one restaurant (0 when nobody liked it).
    pub fn count(&self, name: &str) -> u32 {
        self.counts
            .iter()
            .find(|(counted, _)| counted == name)
            .map_or(0, |(_, count)| *count)
    }

    /// Counts in first-counted order.
    pub fn counts(&self) -> &[(String, u32)] {
        &self.counts
    }

    /// The winning restaurant and its count, or `None` for an empty tally.
    pub fn winner(&self) -> Option<(&str, u32)> {
        let mut best: Option<(&str, u32)> = None;
        for (name, count) in &self.counts {
            if best.is_none_or(|(_, top)| *count > top) {
                best = Some((name.as_str(), *count));
            }
        }
        best
    }

    /// The `winner` event fields: restaurant name (or `None`) and count.
    pub fn outcome(&self) -> (Option<String>, u32) {
        self.winner()
            .map_or((None, 0), |(name, count)| (Some(name.to_owned()), count))
    }
}
