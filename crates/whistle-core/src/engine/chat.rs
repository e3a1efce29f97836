//! Chat entry point: spam guard, `!` commands, pick answers.

use tracing::debug;

use super::RoomEngine;
use crate::host::HostControl;
use crate::player::{HOST_PLAYER_ID, PlayerId, Team};

impl RoomEngine {
    /// `now_ms` is the arrival timestamp in epoch milliseconds; the
    /// spam window is measured against the sender's previous message.
    pub fn on_chat(&mut self, host: &mut dyn HostControl, id: PlayerId, text: &str, now_ms: u64) {
        if id == HOST_PLAYER_ID {
            return;
        }
        let Some(player) = self.roster.get_mut(id) else {
            return;
        };
        player.mark_active();

        let violation = player
            .last_message
            .is_some_and(|last| now_ms.saturating_sub(last) < 1000);
        if violation {
            if player.chat_warnings < 3 {
                player.chat_warnings += 1;
            }
            player.last_message = Some(now_ms);
            let warnings = player.chat_warnings;
            let name = player.name.clone();
            if warnings >= 3 {
                debug!(room = %self.rules.room_name, player = %name, "spam limit hit");
                host.kick_player(id, "spam");
            } else {
                host.send_chat_to(
                    &format!("🚫 Please don't spam {name} ({warnings}/3 warning)"),
                    id,
                );
            }
            return;
        }

        if let Some(rest) = text.strip_prefix('!') {
            let command = rest.split_whitespace().next().unwrap_or("");
            match command.to_ascii_lowercase().as_str() {
                "afk" => self.toggle_afk(host, id),
                "bb" => {
                    host.kick_player(id, "goodbye");
                    self.check_matchmaking(host);
                }
                _ => host.send_chat_to("⚠️ Invalid command.", id),
            }
        } else {
            self.handle_pick_answer(host, id, text);
        }

        // The kick above may already have raced a leave event.
        if let Some(player) = self.roster.get_mut(id) {
            player.chat_warnings = player.chat_warnings.saturating_sub(1);
            player.last_message = Some(now_ms);
        }
    }

    fn toggle_afk(&mut self, host: &mut dyn HostControl, id: PlayerId) {
        let Some(player) = self.roster.get(id) else {
            return;
        };
        let (name, team, afk) = (player.name.clone(), player.team, player.afk);

        if team.is_playing() && host.elapsed_secs().is_some() {
            host.send_chat_to("⚠️ You can't go afk while you are playing.", id);
            return;
        }

        if afk {
            if let Some(player) = self.roster.get_mut(id) {
                player.afk = false;
                player.mark_active();
            }
            host.send_chat(&format!("🥱 {name} is back."));
        } else {
            self.set_team(host, id, Team::Spectator);
            if let Some(player) = self.roster.get_mut(id) {
                player.afk = true;
                player.mark_active();
            }
            host.send_chat(&format!("😴 {name} is afk."));
        }
        self.check_matchmaking(host);
    }
}

#[cfg(test)]
mod tests {
    use super::super::{RoomEngine, RoomRules};
    use crate::player::{HOST_PLAYER_ID, Team};
    use crate::test_helpers::{FakeHost, HostCall, snapshot};

    fn engine() -> RoomEngine {
        RoomEngine::new(RoomRules {
            room_name: "chat".into(),
            default_team_capacity: 4,
            dev_mode: false,
        })
    }

    fn joined(engine: &mut RoomEngine, host: &mut FakeHost, ids: &[u32]) {
        for &id in ids {
            engine.on_player_join(host, snapshot(id, &format!("P{id}")));
        }
    }

    #[test]
    fn three_rapid_messages_get_kicked() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        joined(&mut engine, &mut host, &[1, 2]);
        host.calls.clear();

        engine.on_chat(&mut host, 1, "a", 0);
        engine.on_chat(&mut host, 1, "b", 500);
        engine.on_chat(&mut host, 1, "c", 900);
        assert!(host.calls.contains(&HostCall::ChatTo(
            "🚫 Please don't spam P1 (1/3 warning)".into(),
            1
        )));
        assert!(host.calls.contains(&HostCall::ChatTo(
            "🚫 Please don't spam P1 (2/3 warning)".into(),
            1
        )));

        engine.on_chat(&mut host, 1, "d", 1300);
        assert!(host
            .calls
            .contains(&HostCall::KickPlayer(1, "spam".into())));
    }

    #[test]
    fn warnings_stop_counting_at_the_kick_threshold() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        joined(&mut engine, &mut host, &[1, 2]);

        // Messages still queued behind the kick must not push the
        // counter past three.
        for at in [0, 500, 900, 1300, 1600, 1900] {
            engine.on_chat(&mut host, 1, "x", at);
        }
        assert_eq!(engine.roster().get(1).unwrap().chat_warnings, 3);
    }

    #[test]
    fn slow_messages_decay_warnings() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        joined(&mut engine, &mut host, &[1, 2]);

        engine.on_chat(&mut host, 1, "a", 0);
        engine.on_chat(&mut host, 1, "b", 500);
        assert_eq!(engine.roster().get(1).unwrap().chat_warnings, 1);

        // A 1200ms gap is a clean message and decays the counter.
        engine.on_chat(&mut host, 1, "c", 1700);
        assert_eq!(engine.roster().get(1).unwrap().chat_warnings, 0);
    }

    #[test]
    fn host_pseudo_id_is_ignored() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        joined(&mut engine, &mut host, &[1]);
        host.calls.clear();
        engine.on_chat(&mut host, HOST_PLAYER_ID, "!bb", 0);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn unknown_sender_is_ignored() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        engine.on_chat(&mut host, 9, "!afk", 0);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn afk_toggle_demotes_and_announces() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        joined(&mut engine, &mut host, &[1, 2, 3]);
        host.elapsed = None;
        host.calls.clear();

        engine.on_chat(&mut host, 3, "!afk", 0);
        let player = engine.roster().get(3).unwrap();
        assert!(player.afk);
        assert_eq!(player.team, Team::Spectator);
        assert!(host.calls.contains(&HostCall::Chat("😴 P3 is afk.".into())));
    }

    #[test]
    fn afk_denied_while_playing() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        joined(&mut engine, &mut host, &[1, 2]);
        assert_eq!(host.elapsed, Some(0.0));
        host.calls.clear();

        engine.on_chat(&mut host, 1, "!afk", 0);
        assert!(host.calls.contains(&HostCall::ChatTo(
            "⚠️ You can't go afk while you are playing.".into(),
            1
        )));
        assert!(!engine.roster().get(1).unwrap().afk);
    }

    #[test]
    fn afk_allowed_between_matches() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        joined(&mut engine, &mut host, &[1, 2]);
        host.elapsed = None;
        host.calls.clear();

        engine.on_chat(&mut host, 1, "!afk", 0);
        assert!(engine.roster().get(1).unwrap().afk);
    }

    #[test]
    fn returning_from_afk_reactivates() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        joined(&mut engine, &mut host, &[1, 2, 3]);
        host.elapsed = None;
        engine.on_chat(&mut host, 3, "!afk", 0);
        engine.roster.get_mut(3).unwrap().afk_idle_secs = 200;
        host.calls.clear();

        engine.on_chat(&mut host, 3, "!afk", 5000);
        let player = engine.roster().get(3).unwrap();
        assert!(!player.afk);
        assert_eq!(player.afk_idle_secs, 0);
        assert!(host.calls.contains(&HostCall::Chat("🥱 P3 is back.".into())));
    }

    #[test]
    fn bb_kicks_with_goodbye() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        joined(&mut engine, &mut host, &[1, 2]);
        host.calls.clear();

        engine.on_chat(&mut host, 2, "!bb", 0);
        assert!(host
            .calls
            .contains(&HostCall::KickPlayer(2, "goodbye".into())));
    }

    #[test]
    fn commands_are_case_insensitive() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        joined(&mut engine, &mut host, &[1, 2]);
        host.elapsed = None;
        engine.on_chat(&mut host, 1, "!AFK", 0);
        assert!(engine.roster().get(1).unwrap().afk);
    }

    #[test]
    fn unrecognized_command_warns_sender() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        joined(&mut engine, &mut host, &[1]);
        host.calls.clear();
        engine.on_chat(&mut host, 1, "!dance", 0);
        assert!(host
            .calls
            .contains(&HostCall::ChatTo("⚠️ Invalid command.".into(), 1)));
    }
}
