use std::fmt::{self, Display, Formatter, Write};

use super::types::Command;

/// A trailing argument needs `:` when it is empty, has a space or starts with `:`.
fn needs_colon_prefix(s: &str) -> bool {
    s.is_empty() || s.contains(' ') || s.starts_with(':')
}

/// Parameters must never smuggle a line break or NUL onto the wire.
fn validate_param(param: &str) -> fmt::Result {
    if param.bytes().any(|b| b == b'\r' || b == b'\n' || b == 0) {
        return Err(fmt::Error);
    }
    Ok(())
}

/// The last argument is trailing and gets a `:` prefix only when needed.
fn write_cmd<S: AsRef<str>>(f: &mut Formatter<'_>, cmd: &str, args: &[S]) -> fmt::Result {
    f.write_str(cmd)?;
    let Some((trailing, middle)) = args.split_last() else {
        return Ok(());
    };

    for param in middle {
        validate_param(param.as_ref())?;
        f.write_char(' ')?;
        f.write_str(param.as_ref())?;
    }

    let trailing = trailing.as_ref();
    validate_param(trailing)?;
    f.write_char(' ')?;
    if needs_colon_prefix(trailing) {
        f.write_char(':')?;
    }
    f.write_str(trailing)
}

/// Like [`write_cmd`], but the trailing argument is always `:`-prefixed.
fn write_cmd_freeform<S: AsRef<str>>(f: &mut Formatter<'_>, cmd: &str, args: &[S]) -> fmt::Result {
    f.write_str(cmd)?;
    let Some((trailing, middle)) = args.split_last() else {
        return Ok(());
    };

    for param in middle {
        validate_param(param.as_ref())?;
        f.write_char(' ')?;
        f.write_str(param.as_ref())?;
    }

    validate_param(trailing.as_ref())?;
    f.write_str(" :")?;
    f.write_str(trailing.as_ref())
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Command::PASS(p) => write_cmd(f, "PASS", &[p]),
            Command::NICK(n) => write_cmd(f, "NICK", &[n.to_string()]),
            Command::USER(u) => write_cmd_freeform(
                f,
                "USER",
                &[&u.username, &u.hostname, &u.servername, &u.realname],
            ),
            Command::PING(s, Some(t)) => write_cmd(f, "PING", &[s, t]),
            Command::PING(s, None) => write_cmd(f, "PING", &[s]),
            Command::PONG(s, Some(t)) => write_cmd(f, "PONG", &[s, t]),
            Command::PONG(s, None) => write_cmd(f, "PONG", &[s]),
            Command::JOIN(c, k) if k.is_empty() => write_cmd(f, "JOIN", &[c.join(",")]),
            Command::JOIN(c, k) => write_cmd(f, "JOIN", &[c.join(","), k.join(",")]),
            Command::PART(c, Some(m)) => write_cmd_freeform(f, "PART", &[&c.join(","), m]),
            Command::PART(c, None) => write_cmd(f, "PART", &[c.join(",")]),
            Command::PRIVMSG(t, m) => {
                let targets = t.iter().map(ToString::to_string).collect::<Vec<_>>();
                write_cmd_freeform(f, "PRIVMSG", &[&targets.join(","), m])
            }
            Command::ChannelMODE(c, args) => {
                let mut all = Vec::with_capacity(args.len() + 1);
                all.push(c.as_str());
                all.extend(args.iter().map(String::as_str));
                write_cmd(f, "MODE", &all)
            }
            Command::QUIT(Some(m)) => write_cmd_freeform(f, "QUIT", &[m]),
            Command::QUIT(None) => f.write_str("QUIT"),
            Command::Raw(c, args) => write_cmd(f, c, args),
        }
    }
}
