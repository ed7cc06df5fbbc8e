//! The per-connection session actor.
//!
//! A [`SessionHandler`] is driven by exactly one connection task, which is
//! why its protocol state needs no locks. The only part other sessions can
//! see is its [`SessionHandle`], which is what the registry stores.

use async_trait::async_trait;
use solace_proto::{Message, ProtocolError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{Context, Registry};
use crate::network::ConnectionDelegate;
use crate::state::{MessageInfo, Relay, SessionHandle, SessionInfo};

pub struct SessionHandler {
    relay: Arc<Relay>,
    registry: Arc<Registry>,
    handle: Arc<SessionHandle>,
    session_info: SessionInfo,
    message_info: MessageInfo,
    authenticated: bool,
}

impl SessionHandler {
    pub fn new(relay: Arc<Relay>, registry: Arc<Registry>) -> Self {
        let handle = SessionHandle::new();
        debug!(session_id = %handle.id(), "Session handler created");
        Self {
            relay,
            registry,
            handle,
            session_info: SessionInfo::default(),
            message_info: MessageInfo::default(),
            authenticated: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.handle.id()
    }

    pub fn handle(&self) -> &Arc<SessionHandle> {
        &self.handle
    }

    pub fn session_info(&self) -> &SessionInfo {
        &self.session_info
    }

    pub fn message_info(&self) -> &MessageInfo {
        &self.message_info
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Dispatch one inbound message. Errors end the command, never the
    /// session.
    pub async fn process_message(&mut self, msg: Message) {
        let mut ctx = Context::new(
            &self.relay,
            &self.handle,
            &mut self.session_info,
            &mut self.message_info,
            &mut self.authenticated,
        );

        if let Err(e) = self.registry.dispatch(&mut ctx, &msg).await {
            let code = e.error_code();
            if code == "internal_error" {
                error!(session_id = %self.handle.id(), command = msg.command.name(), error = %e, code, "Handler failed");
            } else {
                warn!(session_id = %self.handle.id(), command = msg.command.name(), error = %e, code, "Command dropped");
            }
        }
    }

    /// Drop this session from the registry and release its writer. Runs for
    /// every way a connection can end and is safe to repeat. Returns whether
    /// this call changed anything.
    async fn teardown(&mut self, reason: &'static str) -> bool {
        let unregistered = self.relay.sessions.unregister_session(&self.handle).await;
        let had_writer = self.handle.clear_writer();
        self.authenticated = false;

        let closed = unregistered || had_writer;
        if closed {
            info!(
                session_id = %self.handle.id(),
                nick = ?self.handle.nick(),
                registered = self.session_info.is_registered(),
                reason,
                "Session closed"
            );
        }
        closed
    }
}

#[async_trait]
impl ConnectionDelegate for SessionHandler {
    async fn deliver_writer(&mut self, writer: mpsc::Sender<Message>) {
        self.handle.set_writer(writer);

        let origin = self.relay.origin();
        let ping = Message::ping(origin).with_prefix(origin);
        if let Err(e) = self.handle.send(ping).await {
            debug!(session_id = %self.handle.id(), error = %e, "Initial PING not delivered");
        }
    }

    async fn deliver_inbound(&mut self, msg: Message) {
        self.process_message(msg).await;
    }

    async fn channel_inactive(&mut self) {
        self.teardown("connection closed").await;
    }

    async fn report_child_channel_error(&mut self, error: &ProtocolError) {
        warn!(session_id = %self.handle.id(), %error, "Connection error");
        self.teardown("connection error").await;
    }

    async fn did_shutdown_child_channel(&mut self) {
        self.teardown("shutdown").await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::directory::{DirectoryError, UserDirectory};
    use crate::protocol::{
        ChannelPacket, MessageFlag, MessagePacket, PartMessage, User, UserConfiguration,
        decode_origin, decode_packet, encode_origin, encode_packet,
    };
    use crate::state::SessionState;
    use parking_lot::Mutex;
    use solace_proto::{Command, Nickname, Recipient};
    use std::collections::BTreeSet;
    use std::time::Duration;
    use tokio::time::timeout;

    /// In-memory directory that records every user and can be told to fail.
    #[derive(Default)]
    struct MemoryDirectory {
        users: Mutex<Vec<User>>,
        reject: bool,
    }

    #[async_trait]
    impl UserDirectory for MemoryDirectory {
        async fn create_user(&self, user: &User) -> Result<(), DirectoryError> {
            if self.reject {
                return Err(DirectoryError::Rejected(409));
            }
            self.users.lock().push(user.clone());
            Ok(())
        }
    }

    fn test_config() -> Config {
        toml::from_str(
            r#"
            [server]
            name = "relay.test"

            [listen]
            address = "127.0.0.1:0"

            [keepalive]
            ping_after_pong_secs = 0
            "#,
        )
        .unwrap()
    }

    fn relay_with(directory: MemoryDirectory) -> (Arc<Relay>, Arc<MemoryDirectory>) {
        let directory = Arc::new(directory);
        let relay = Relay::new(&test_config(), directory.clone());
        (relay, directory)
    }

    /// A session with a writer attached, its initial PING already drained.
    async fn connected(relay: &Arc<Relay>) -> (SessionHandler, mpsc::Receiver<Message>) {
        let mut session = SessionHandler::new(Arc::clone(relay), Arc::new(Registry::new()));
        let (tx, mut rx) = mpsc::channel(16);
        session.deliver_writer(tx).await;
        let ping = rx.recv().await.unwrap();
        assert!(matches!(ping.command, Command::PING(..)));
        (session, rx)
    }

    fn nick(name: &str) -> Nickname {
        Nickname::new(name, Some(Uuid::new_v4())).unwrap()
    }

    fn nick_msg(nick: &Nickname) -> Message {
        Message::from(Command::NICK(nick.clone()))
    }

    fn packet_to(recipient: &Nickname, flag: MessageFlag) -> Message {
        let packet = MessagePacket::new("pkt-1", flag);
        Message::privmsg(
            Recipient::Nick(recipient.clone()),
            encode_packet(&packet).unwrap(),
        )
    }

    async fn next(rx: &mut mpsc::Receiver<Message>) -> Message {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for message")
            .expect("writer closed")
    }

    fn channel_packet(name: &str, admin: &str) -> String {
        encode_packet(&ChannelPacket {
            name: name.to_string(),
            channel_operator_admin: admin.to_string(),
            channel_operators: BTreeSet::from([admin.to_string()]),
            members: BTreeSet::from([admin.to_string()]),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn deliver_writer_sends_server_ping() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let mut session = SessionHandler::new(relay, Arc::new(Registry::new()));
        let (tx, mut rx) = mpsc::channel(4);
        session.deliver_writer(tx).await;

        let ping = rx.recv().await.unwrap();
        assert_eq!(ping.prefix.as_deref(), Some("relay.test"));
        assert_eq!(
            ping.command,
            Command::PING("relay.test".to_string(), None)
        );
    }

    #[tokio::test]
    async fn nick_then_user_registers() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut session, _rx) = connected(&relay).await;
        let alice = nick("alice");

        session.process_message(nick_msg(&alice)).await;
        assert_eq!(session.session_info().state(), SessionState::RegisterNick);
        assert!(session.is_authenticated());
        assert_eq!(
            decode_origin(session.message_info().origin.as_deref().unwrap()).unwrap(),
            alice
        );

        let user: Message = "USER alice 0 * :Alice".parse().unwrap();
        session.process_message(user).await;
        assert_eq!(session.session_info().state(), SessionState::Registered);
        assert_eq!(relay.sessions.get_session(&alice).unwrap().id(), session.id());
    }

    #[tokio::test]
    async fn user_before_nick_is_rejected() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut session, _rx) = connected(&relay).await;

        let user: Message = "USER alice 0 * :Alice".parse().unwrap();
        session.process_message(user).await;
        assert_eq!(session.session_info().state(), SessionState::Initial);
        assert!(session.session_info().user_info().is_none());
    }

    #[tokio::test]
    async fn nick_change_leaves_single_entry() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut session, _rx) = connected(&relay).await;

        session.process_message(nick_msg(&nick("alice"))).await;
        let renamed = nick("alicia");
        session.process_message(nick_msg(&renamed)).await;

        assert_eq!(relay.sessions.user_count(), 1);
        assert!(relay.sessions.get_session(&renamed).is_ok());
    }

    #[tokio::test]
    async fn ping_is_answered_with_pong() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut session, mut rx) = connected(&relay).await;

        session.process_message("PING token".parse().unwrap()).await;
        let pong = next(&mut rx).await;
        assert_eq!(pong.command, Command::PONG("token".to_string(), None));
    }

    #[tokio::test]
    async fn pong_schedules_ping() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut session, mut rx) = connected(&relay).await;

        session.process_message("PONG relay.test".parse().unwrap()).await;
        let ping = next(&mut rx).await;
        assert_eq!(ping.command, Command::PING("relay.test".to_string(), None));
    }

    #[tokio::test]
    async fn relays_packet_to_online_recipient() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut alice_session, _alice_rx) = connected(&relay).await;
        let (mut bob_session, mut bob_rx) = connected(&relay).await;
        let alice = nick("alice");
        let bob = nick("bob");
        alice_session.process_message(nick_msg(&alice)).await;
        bob_session.process_message(nick_msg(&bob)).await;

        let msg = packet_to(&bob, MessageFlag::PrivateMessage)
            .with_prefix(encode_origin(&alice).unwrap());
        alice_session.process_message(msg).await;

        let relayed = next(&mut bob_rx).await;
        assert_eq!(decode_origin(relayed.prefix.as_deref().unwrap()).unwrap(), alice);
        let Command::PRIVMSG(targets, payload) = relayed.command else {
            panic!("expected PRIVMSG");
        };
        assert_eq!(targets, vec![Recipient::Nick(bob)]);
        let packet: MessagePacket = decode_packet(&payload).unwrap();
        assert_eq!(packet.id, "pkt-1");
    }

    #[tokio::test]
    async fn sender_falls_back_to_session_nick() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut alice_session, _alice_rx) = connected(&relay).await;
        let (mut bob_session, mut bob_rx) = connected(&relay).await;
        let alice = nick("alice");
        let bob = nick("bob");
        alice_session.process_message(nick_msg(&alice)).await;
        bob_session.process_message(nick_msg(&bob)).await;

        alice_session
            .process_message(packet_to(&bob, MessageFlag::PrivateMessage))
            .await;

        let relayed = next(&mut bob_rx).await;
        assert_eq!(decode_origin(relayed.prefix.as_deref().unwrap()).unwrap(), alice);
    }

    #[tokio::test]
    async fn offline_recipient_drops_packet() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut session, mut rx) = connected(&relay).await;
        session.process_message(nick_msg(&nick("alice"))).await;

        session
            .process_message(packet_to(&nick("carol"), MessageFlag::PrivateMessage))
            .await;

        session.process_message("PING still-here".parse().unwrap()).await;
        let reply = next(&mut rx).await;
        assert_eq!(reply.command, Command::PONG("still-here".to_string(), None));
    }

    #[tokio::test]
    async fn publish_creates_user_and_registers() {
        let (relay, directory) = relay_with(MemoryDirectory::default());
        let (mut session, _rx) = connected(&relay).await;
        let alice = nick("alice");

        let mut packet = MessagePacket::new("pub-1", MessageFlag::PublishUserConfiguration);
        packet.user_configuration = Some(UserConfiguration::default());
        let msg = Message::privmsg(
            Recipient::Nick(alice.clone()),
            encode_packet(&packet).unwrap(),
        );
        session.process_message(msg).await;

        let users = directory.users.lock();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "alice");
        assert!(relay.sessions.get_session(&alice).is_ok());
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn rejected_publish_registers_nothing() {
        let (relay, _) = relay_with(MemoryDirectory {
            reject: true,
            ..Default::default()
        });
        let (mut session, _rx) = connected(&relay).await;
        let alice = nick("alice");

        let mut packet = MessagePacket::new("pub-1", MessageFlag::PublishUserConfiguration);
        packet.user_configuration = Some(UserConfiguration::default());
        session
            .process_message(Message::privmsg(
                Recipient::Nick(alice.clone()),
                encode_packet(&packet).unwrap(),
            ))
            .await;

        assert!(relay.sessions.get_session(&alice).is_err());
        assert_eq!(relay.sessions.user_count(), 0);
    }

    #[tokio::test]
    async fn publish_without_configuration_is_dropped() {
        let (relay, directory) = relay_with(MemoryDirectory::default());
        let (mut session, _rx) = connected(&relay).await;

        session
            .process_message(packet_to(&nick("alice"), MessageFlag::PublishUserConfiguration))
            .await;
        assert!(directory.users.lock().is_empty());
        assert_eq!(relay.sessions.user_count(), 0);
    }

    #[tokio::test]
    async fn join_echoes_tags() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut session, mut rx) = connected(&relay).await;
        session.process_message(nick_msg(&nick("alice"))).await;

        let join = Message::from(Command::JOIN(vec!["#ops".to_string()], Vec::new()))
            .with_tag("channel-packet", Some(channel_packet("#ops", "alice")))
            .with_tag("create-channel", Some("true"));
        session.process_message(join.clone()).await;

        let echo = next(&mut rx).await;
        assert_eq!(echo.tags, join.tags);
        assert_eq!(echo.command, join.command);
        assert!(relay.channels.find_channel("#ops").unwrap().members.contains("alice"));
    }

    #[tokio::test]
    async fn mode_creation_requires_admin() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut session, mut rx) = connected(&relay).await;
        session.process_message(nick_msg(&nick("mallory"))).await;

        let mode = Message::from(Command::ChannelMODE("#ops".to_string(), Vec::new()))
            .with_tag("channel-packet", Some(channel_packet("#ops", "alice")))
            .with_tag("create-channel", Some("true"));
        session.process_message(mode).await;
        assert!(!relay.channels.channel_exists("#ops"));

        session.process_message("PING after".parse().unwrap()).await;
        let reply = next(&mut rx).await;
        assert_eq!(reply.command, Command::PONG("after".to_string(), None));
    }

    #[tokio::test]
    async fn mode_creation_by_admin_echoes() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut session, mut rx) = connected(&relay).await;
        session.process_message(nick_msg(&nick("alice"))).await;

        let mode = Message::from(Command::ChannelMODE("#ops".to_string(), Vec::new()))
            .with_tag("channel-packet", Some(channel_packet("#ops", "alice")))
            .with_tag("create-channel", Some("true"));
        session.process_message(mode.clone()).await;

        let echo = next(&mut rx).await;
        assert_eq!(echo.tags, mode.tags);
        assert_eq!(relay.channels.find_channel("#ops").unwrap().admin, "alice");
    }

    #[tokio::test]
    async fn only_admin_destroys_channel() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut bob_session, _bob_rx) = connected(&relay).await;
        bob_session.process_message(nick_msg(&nick("bob"))).await;

        relay.channels.create_channel(
            decode_packet(&channel_packet("#ops", "alice")).unwrap(),
            "alice",
        );
        relay.channels.add_member("#ops", "bob");

        let destroy = encode_packet(&PartMessage {
            message: "bye".to_string(),
            destroy_channel: true,
        })
        .unwrap();
        let part = Message::from(Command::PART(vec!["#ops".to_string()], None))
            .with_tag("part-message", Some(destroy.clone()));
        bob_session.process_message(part.clone()).await;

        let info = relay.channels.find_channel("#ops").unwrap();
        assert!(!info.members.contains("bob"));

        let (mut alice_session, _alice_rx) = connected(&relay).await;
        alice_session.process_message(nick_msg(&nick("alice"))).await;
        alice_session.process_message(part).await;
        assert!(!relay.channels.channel_exists("#ops"));
    }

    async fn close_via(session: &mut SessionHandler, trigger: usize) {
        match trigger {
            0 => session.channel_inactive().await,
            1 => {
                let error = ProtocolError::Io(std::io::Error::other("connection reset"));
                session.report_child_channel_error(&error).await
            }
            _ => session.did_shutdown_child_channel().await,
        }
    }

    #[tokio::test]
    async fn teardown_unregisters_once_in_any_trigger_order() {
        for order in [[0, 1, 2], [1, 2, 0], [2, 0, 1], [1, 1, 0]] {
            let (relay, _) = relay_with(MemoryDirectory::default());
            let (mut session, _rx) = connected(&relay).await;
            let alice = nick("alice");
            session.process_message(nick_msg(&alice)).await;

            close_via(&mut session, order[0]).await;
            assert_eq!(relay.sessions.user_count(), 0);

            // Later triggers must not touch whoever holds the name now.
            let (mut replacement, _replacement_rx) = connected(&relay).await;
            replacement.process_message(nick_msg(&alice)).await;

            for &trigger in &order[1..] {
                close_via(&mut session, trigger).await;
            }
            assert!(!session.teardown("repeat").await);

            assert_eq!(
                relay.sessions.get_session(&alice).unwrap().id(),
                replacement.id()
            );
            assert!(!session.handle().has_writer());
            assert!(!session.is_authenticated());
        }
    }

    #[tokio::test]
    async fn first_teardown_reports_change() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut session, _rx) = connected(&relay).await;
        session.process_message(nick_msg(&nick("alice"))).await;

        assert!(session.teardown("closed").await);
        assert!(!session.teardown("closed").await);
    }

    #[tokio::test]
    async fn full_recipient_queue_does_not_block_sender() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut alice_session, _alice_rx) = connected(&relay).await;

        // Bob's queue holds one message and the greeting PING fills it.
        let mut bob_session = SessionHandler::new(Arc::clone(&relay), Arc::new(Registry::new()));
        let (tx, mut bob_rx) = mpsc::channel(1);
        bob_session.deliver_writer(tx).await;

        let alice = nick("alice");
        let bob = nick("bob");
        alice_session.process_message(nick_msg(&alice)).await;
        bob_session.process_message(nick_msg(&bob)).await;

        timeout(
            Duration::from_secs(1),
            alice_session.process_message(packet_to(&bob, MessageFlag::PrivateMessage)),
        )
        .await
        .expect("relay blocked on a full queue");

        let update = Message::from(Command::ChannelMODE("#ops".to_string(), Vec::new()));
        timeout(Duration::from_secs(1), alice_session.process_message(update))
            .await
            .expect("broadcast blocked on a full queue");

        assert!(matches!(next(&mut bob_rx).await.command, Command::PING(..)));
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn failing_recipient_does_not_stop_the_rest() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut alice_session, _alice_rx) = connected(&relay).await;
        let (mut bob_session, mut bob_rx) = connected(&relay).await;
        let bob = nick("bob");
        alice_session.process_message(nick_msg(&nick("alice"))).await;
        bob_session.process_message(nick_msg(&bob)).await;

        // No packet recipient, so the channel leg fails.
        let packet = MessagePacket::new("pkt-2", MessageFlag::PrivateMessage);
        let msg = Message::from(Command::PRIVMSG(
            vec![Recipient::Channel("#ops".to_string()), Recipient::Nick(bob.clone())],
            encode_packet(&packet).unwrap(),
        ));
        alice_session.process_message(msg).await;

        let relayed = next(&mut bob_rx).await;
        let Command::PRIVMSG(targets, _) = relayed.command else {
            panic!("expected PRIVMSG");
        };
        assert_eq!(targets, vec![Recipient::Nick(bob)]);
    }

    #[tokio::test]
    async fn keepalive_ping_dropped_when_queue_stays_full() {
        let config: Config = toml::from_str(
            r#"
            [server]
            name = "relay.test"

            [listen]
            address = "127.0.0.1:0"

            [keepalive]
            ping_after_pong_secs = 0
            tolerance_secs = 0
            "#,
        )
        .unwrap();
        let relay = Relay::new(&config, Arc::new(MemoryDirectory::default()));
        let mut session = SessionHandler::new(Arc::clone(&relay), Arc::new(Registry::new()));
        let (tx, mut rx) = mpsc::channel(1);
        session.deliver_writer(tx).await;

        session.process_message("PONG relay.test".parse().unwrap()).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(matches!(next(&mut rx).await.command, Command::PING(..)));
        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());
    }

    #[tokio::test]
    async fn quit_unregisters() {
        let (relay, _) = relay_with(MemoryDirectory::default());
        let (mut session, _rx) = connected(&relay).await;
        session.process_message(nick_msg(&nick("alice"))).await;

        session.process_message("QUIT :bye".parse().unwrap()).await;
        assert_eq!(relay.sessions.user_count(), 0);
    }
}
