//! Per-connection protocol state.
//!
//! ```text
//! Initial --NICK--> RegisterNick --USER--> Registered
//!    ^                   |
//!    +------ NICK -------+   (NICK always restarts from Initial)
//! ```
//!
//! `RegisterUserInfo` is transient: it is entered and left while a USER is
//! being applied.

use solace_proto::{Nickname, UserDetails};

use crate::error::HandlerError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Initial,
    RegisterNick,
    RegisterUserInfo,
    Registered,
}

/// Identity derived from the nick once a session is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentifier {
    pub nick: Nickname,
}

impl UserIdentifier {
    pub fn new(nick: Nickname) -> Self {
        Self { nick }
    }
}

/// Invariant: `state == Registered` implies `nick` and `user_info` are set.
#[derive(Debug, Clone, Default)]
pub struct SessionInfo {
    state: SessionState,
    password: Option<String>,
    nick: Option<Nickname>,
    user_id: Option<UserIdentifier>,
    user_info: Option<UserDetails>,
}

impl SessionInfo {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn nick(&self) -> Option<&Nickname> {
        self.nick.as_ref()
    }

    pub fn user_id(&self) -> Option<&UserIdentifier> {
        self.user_id.as_ref()
    }

    pub fn user_info(&self) -> Option<&UserDetails> {
        self.user_info.as_ref()
    }

    pub fn is_registered(&self) -> bool {
        self.state == SessionState::Registered
    }

    pub fn set_password(&mut self, password: String) {
        self.password = Some(password);
    }

    /// Apply a NICK: restart from `Initial`, record the nick and the sender
    /// identity, move to `RegisterNick`.
    pub fn apply_nick(&mut self, nick: Nickname, sender: Option<UserIdentifier>) {
        self.state = SessionState::Initial;
        self.nick = Some(nick);
        self.user_id = sender;
        self.state = SessionState::RegisterNick;
    }

    /// Apply a USER. Only legal directly after a NICK.
    pub fn apply_user(&mut self, info: UserDetails) -> Result<(), HandlerError> {
        if self.state != SessionState::RegisterNick {
            return Err(HandlerError::InvalidState {
                expected: SessionState::RegisterNick,
                actual: self.state,
            });
        }
        let Some(nick) = self.nick.clone() else {
            return Err(HandlerError::InvalidState {
                expected: SessionState::RegisterNick,
                actual: SessionState::Initial,
            });
        };

        self.state = SessionState::RegisterUserInfo;
        self.user_info = Some(info);
        self.user_id = Some(UserIdentifier::new(nick));
        self.state = SessionState::Registered;
        Ok(())
    }
}

/// Cached values stamped on outgoing messages.
#[derive(Debug, Clone, Default)]
pub struct MessageInfo {
    /// Encoded sender identity of this session.
    pub origin: Option<String>,
}
