//! Entry page rendering via `minijinja`.
//!
//! The page template is compiled into the binary and loaded into a
//! `minijinja` [`Environment`] once at startup.

use minijinja::{Environment, context};

use crate::error::WebError;

/// Template source for `GET /`.
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Path the browser client opens its `WebSocket` on.
pub const WS_PATH: &str = "/ws";

/// Holds the compiled page templates.
#[derive(Debug)]
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    /// Compile the built-in templates.
    pub fn new() -> Result<Self, WebError> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the entry page.
    pub fn index(&self) -> Result<String, WebError> {
        let html = self.env.get_template("index.html")?.render(context! {
            title => "Chowvote",
            ws_path => WS_PATH,
        })?;
        Ok(html)
    }
}
