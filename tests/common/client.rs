//! Test relay client.
//!
//! Speaks the wire protocol with `solace-proto` values so tests can send
//! commands and assert on what the relay writes back.

use solace_proto::{Command, Message, Nickname, Recipient};
use solace_relayd::protocol::{MessagePacket, encode_origin, encode_packet};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test relay client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: Nickname,
}

#[allow(dead_code)]
impl TestClient {
    /// Connect and consume the relay's greeting PING.
    pub async fn connect(address: &str, nick: Nickname) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();

        let mut client = Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            nick,
        };

        let greeting = client.recv().await?;
        if !matches!(greeting.command, Command::PING(..)) {
            anyhow::bail!("expected greeting PING, got {greeting:?}");
        }
        Ok(client)
    }

    pub fn nick(&self) -> &Nickname {
        &self.nick
    }

    /// Send a raw line.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Send bytes exactly as given, terminator included.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        self.send_raw(&msg.to_string()).await
    }

    pub async fn send_command(&mut self, cmd: Command) -> anyhow::Result<()> {
        self.send(Message::from(cmd)).await
    }

    /// Receive a single message from the relay.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a message with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("connection closed");
        }
        line.parse::<Message>()
            .map_err(|e| anyhow::anyhow!("Parse error: {}", e))
    }

    /// Receive messages until the predicate returns true.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Message>>
    where
        F: FnMut(&Message) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                break;
            }
        }
        Ok(messages)
    }

    /// True if nothing arrives within `dur`.
    pub async fn is_silent(&mut self, dur: Duration) -> bool {
        self.recv_timeout(dur).await.is_err()
    }

    /// Register with NICK and USER, then confirm the session answers.
    pub async fn register(&mut self) -> anyhow::Result<()> {
        self.send_command(Command::NICK(self.nick.clone())).await?;
        let user = format!("USER {} 0 * :Test User", self.nick.name);
        self.send_raw(&user).await?;
        self.ping("registered").await
    }

    /// Round-trip a PING; any message before the PONG is an error.
    pub async fn ping(&mut self, token: &str) -> anyhow::Result<()> {
        self.send(Message::ping(token)).await?;
        let reply = self.recv().await?;
        match reply.command {
            Command::PONG(ref t, _) if t == token => Ok(()),
            _ => anyhow::bail!("expected PONG {token}, got {reply:?}"),
        }
    }

    /// Send `packet` to `recipient` with this client's encoded origin.
    pub async fn send_packet(
        &mut self,
        recipient: Recipient,
        packet: &MessagePacket,
    ) -> anyhow::Result<()> {
        let msg = Message::privmsg(recipient, encode_packet(packet)?)
            .with_prefix(encode_origin(&self.nick)?);
        self.send(msg).await
    }

    /// Send QUIT.
    pub async fn quit(&mut self, reason: Option<String>) -> anyhow::Result<()> {
        self.send_command(Command::QUIT(reason)).await
    }
}
