#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{DispatchResult, dispatch, translate_key};
use core_auth::AuthSession;
use core_events::{KeyCode, KeyEvent};
use core_model::{AppModel, Focus};
use std::time::{Duration, Instant};

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Model plus a manual clock. Each key press advances the clock by 30ms.
pub struct Harness {
    pub model: AppModel<AuthSession>,
    pub now: Instant,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            model: AppModel::new(AuthSession::new(), ms(500)),
            now: Instant::now(),
        }
    }

    pub fn key(&mut self, key: KeyEvent) -> DispatchResult {
        self.now += ms(30);
        self.model.tick(self.now);
        match translate_key(self.model.screen(), &key) {
            Some(action) => dispatch(action, &mut self.model, &[], self.now),
            None => DispatchResult::clean(),
        }
    }

    pub fn press(&mut self, code: KeyCode) -> DispatchResult {
        self.key(KeyEvent::plain(code))
    }

    pub fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    pub fn advance(&mut self, by: Duration) -> bool {
        self.now += by;
        self.model.tick(self.now)
    }

    pub fn focus(&self) -> Option<Focus> {
        self.model.login().map(|l| l.focus)
    }
}
