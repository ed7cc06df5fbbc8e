use crate::error::MessageParseError;
use crate::nick::{is_channel_name, Recipient};

use super::types::{Command, UserDetails};

fn require(args: &[&str], expected: usize) -> Result<(), MessageParseError> {
    if args.len() < expected {
        return Err(MessageParseError::NotEnoughArguments {
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

impl Command {
    /// Build a command from its wire name and raw arguments.
    pub fn new(cmd: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
        let upper = cmd.to_ascii_uppercase();
        let command = match upper.as_str() {
            "PASS" => {
                require(&args, 1)?;
                Command::PASS(args[0].to_owned())
            }
            "NICK" => {
                require(&args, 1)?;
                Command::NICK(args[0].parse()?)
            }
            "USER" => {
                require(&args, 4)?;
                Command::USER(UserDetails {
                    username: args[0].to_owned(),
                    hostname: args[1].to_owned(),
                    servername: args[2].to_owned(),
                    realname: args[3].to_owned(),
                })
            }
            "PING" => {
                require(&args, 1)?;
                Command::PING(args[0].to_owned(), args.get(1).map(|s| (*s).to_owned()))
            }
            "PONG" => {
                require(&args, 1)?;
                Command::PONG(args[0].to_owned(), args.get(1).map(|s| (*s).to_owned()))
            }
            "JOIN" => {
                require(&args, 1)?;
                let keys = args.get(1).map(|k| split_list(k)).unwrap_or_default();
                Command::JOIN(split_list(args[0]), keys)
            }
            "PART" => {
                require(&args, 1)?;
                Command::PART(split_list(args[0]), args.get(1).map(|s| (*s).to_owned()))
            }
            "PRIVMSG" => {
                require(&args, 2)?;
                Command::PRIVMSG(Recipient::parse_list(args[0])?, args[1].to_owned())
            }
            "MODE" if args.first().is_some_and(|t| is_channel_name(t)) => Command::ChannelMODE(
                args[0].to_owned(),
                args[1..].iter().map(|s| (*s).to_owned()).collect(),
            ),
            "QUIT" => Command::QUIT(args.first().map(|s| (*s).to_owned())),
            _ => Command::Raw(upper, args.into_iter().map(str::to_owned).collect()),
        };
        Ok(command)
    }
}
