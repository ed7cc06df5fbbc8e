use crate::nick::{Nickname, Recipient};

/// Registration details carried by `USER`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDetails {
    /// Account name.
    pub username: String,
    /// Host name as reported by the client.
    pub hostname: String,
    /// Server name as reported by the client.
    pub servername: String,
    /// Free-form real name.
    pub realname: String,
}

/// The commands the relay understands.
///
/// Anything else, numerics included, parses into [`Command::Raw`] so it can
/// still be logged and forwarded.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Command {
    /// `PASS password`
    PASS(String),
    /// `NICK name[:device]`
    NICK(Nickname),
    /// `USER username hostname servername :realname`
    USER(UserDetails),
    /// `PING server [server2]`
    PING(String, Option<String>),
    /// `PONG server [server2]`
    PONG(String, Option<String>),
    /// `JOIN channels [keys]`, both comma separated on the wire.
    JOIN(Vec<String>, Vec<String>),
    /// `PART channels [:message]`
    PART(Vec<String>, Option<String>),
    /// `PRIVMSG targets :payload`
    PRIVMSG(Vec<Recipient>, String),
    /// `MODE #channel [modes...]`
    ChannelMODE(String, Vec<String>),
    /// `QUIT [:message]`
    QUIT(Option<String>),
    /// Any other command, verbatim.
    Raw(String, Vec<String>),
}

impl Command {
    /// Wire name of the command, as used for dispatch.
    pub fn name(&self) -> &str {
        match self {
            Command::PASS(_) => "PASS",
            Command::NICK(_) => "NICK",
            Command::USER(_) => "USER",
            Command::PING(..) => "PING",
            Command::PONG(..) => "PONG",
            Command::JOIN(..) => "JOIN",
            Command::PART(..) => "PART",
            Command::PRIVMSG(..) => "PRIVMSG",
            Command::ChannelMODE(..) => "MODE",
            Command::QUIT(_) => "QUIT",
            Command::Raw(name, _) => name,
        }
    }
}
