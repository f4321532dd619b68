use std::time::Instant;

/// Status text that disappears on the first tick after `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

impl EphemeralMessage {
    pub fn new<S: Into<String>>(text: S, expires_at: Instant) -> Self {
        Self {
            text: text.into(),
            expires_at,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn ephemeral_lifecycle() {
        let t0 = Instant::now();
        let msg = EphemeralMessage::new("Message", t0 + Duration::from_millis(50));
        assert!(!msg.is_expired(t0));
        assert!(msg.is_expired(t0 + Duration::from_millis(50)));
    }
}
