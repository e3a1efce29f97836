//! Pick negotiation: one player at a time drafts spectators onto the
//! short side.

use rand::seq::SliceRandom;

use super::RoomEngine;
use crate::format;
use crate::host::HostControl;
use crate::player::{PlayerId, Team};

impl RoomEngine {
    /// Hands the pick to `picker`, clearing any previous holder. A
    /// repeat grant to the current picker skips the announcement and
    /// just refreshes their numbered queue.
    pub(super) fn begin_pick(&mut self, host: &mut dyn HostControl, picker: PlayerId) {
        let previous = self.roster.clear_pick_flags();
        let Some(player) = self.roster.get_mut(picker) else {
            return;
        };
        player.pick_mode = true;
        if previous != Some(picker) {
            let name = player.name.clone();
            host.send_chat(&format!("👉 {name} is picking..."));
        }
        self.send_picker_prompt(host, picker);
    }

    /// "#1 - A, #2 - B, ..." in join order, sent privately.
    fn send_picker_prompt(&self, host: &mut dyn HostControl, picker: PlayerId) {
        let listing: Vec<String> = self
            .roster
            .spectator_queue()
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let name = self.roster.get(*id).map_or("?", |p| p.name.as_str());
                format!("#{} - {}", index + 1, name)
            })
            .collect();
        host.send_chat_to(&listing.join(", "), picker);
    }

    /// Interprets a chat line as a pick answer. Returns false when the
    /// sender is not the active picker or the text is not an answer,
    /// letting it fall through to ordinary chat.
    pub(super) fn handle_pick_answer(
        &mut self,
        host: &mut dyn HostControl,
        picker: PlayerId,
        text: &str,
    ) -> bool {
        if !self.roster.get(picker).is_some_and(|p| p.pick_mode) {
            return false;
        }
        let answer = text.trim();
        match answer {
            "top" => {
                let queue = self.roster.spectator_queue();
                self.fill_from_queue(host, picker, queue, "⬆️ {} chose top.");
            }
            "bottom" => {
                let mut queue = self.roster.spectator_queue();
                queue.reverse();
                self.fill_from_queue(host, picker, queue, "⬇️ {} chose bottom.");
            }
            "random" => {
                let mut queue = self.roster.spectator_queue();
                queue.shuffle(&mut rand::rng());
                self.fill_from_queue(host, picker, queue, "🔃 {} chose random.");
            }
            _ => {
                let Ok(number) = answer.parse::<i64>() else {
                    return false;
                };
                self.pick_by_number(host, picker, number);
            }
        }
        true
    }

    /// The team currently needing players; on equal sizes, the side
    /// opposite the picker.
    fn short_side(&self, picker: PlayerId) -> Team {
        let red = self.roster.team_ids(Team::Red).len();
        let blue = self.roster.team_ids(Team::Blue).len();
        if red < blue {
            Team::Red
        } else if blue < red {
            Team::Blue
        } else {
            self.roster
                .get(picker)
                .map_or(Team::Blue, |p| p.team.opponent())
        }
    }

    fn fill_from_queue(
        &mut self,
        host: &mut dyn HostControl,
        picker: PlayerId,
        queue: Vec<PlayerId>,
        template: &str,
    ) {
        let short_team = self.short_side(picker);
        let short_len = self.roster.team_ids(short_team).len();
        let fuller_len = self.roster.team_ids(short_team.opponent()).len();
        let capacity =
            format::team_capacity(self.roster.active_count(), self.rules.default_team_capacity);
        let needed = fuller_len.min(capacity).saturating_sub(short_len).max(1);

        for id in queue.into_iter().take(needed) {
            self.set_team(host, id, short_team);
        }
        let name = self.picker_name(picker);
        self.finish_pick(host, picker, &template.replacen("{}", &name, 1));
    }

    fn pick_by_number(&mut self, host: &mut dyn HostControl, picker: PlayerId, number: i64) {
        let queue = self.roster.spectator_queue();
        let chosen = usize::try_from(number - 1)
            .ok()
            .and_then(|index| queue.get(index).copied());
        let Some(chosen) = chosen else {
            host.send_chat_to("⚠️ Invalid number.", picker);
            return;
        };

        let short_team = self.short_side(picker);
        let chosen_name = self.picker_name(chosen);
        self.set_team(host, chosen, short_team);
        let name = self.picker_name(picker);
        self.finish_pick(host, picker, &format!("➡️ {name} chose {chosen_name}."));
    }

    fn finish_pick(&mut self, host: &mut dyn HostControl, picker: PlayerId, announcement: &str) {
        if let Some(player) = self.roster.get_mut(picker) {
            player.pick_mode = false;
        }
        host.send_chat(announcement);
        self.check_matchmaking(host);
    }

    fn picker_name(&self, id: PlayerId) -> String {
        self.roster
            .get(id)
            .map_or_else(|| format!("#{id}"), |p| p.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{RoomEngine, RoomRules};
    use crate::player::Team;
    use crate::test_helpers::{FakeHost, HostCall, snapshot};

    fn engine() -> RoomEngine {
        RoomEngine::new(RoomRules {
            room_name: "picks".into(),
            default_team_capacity: 4,
            dev_mode: false,
        })
    }

    /// Big-format position after a red win: red keeps four, blue needs
    /// refilling from five spectators, red's first player picks.
    fn post_win_position(engine: &mut RoomEngine, host: &mut FakeHost) {
        for id in 1..=9u32 {
            engine.roster.add(snapshot(id, &format!("P{id}")));
        }
        for id in 1..=4u32 {
            engine.roster.get_mut(id).unwrap().team = Team::Red;
        }
        engine.roster.get_mut(5).unwrap().team = Team::Blue;
        engine.roster.get_mut(1).unwrap().pick_mode = true;
        host.stadium = "big".to_string();
        host.score_limit = 3;
        host.time_limit = 3;
    }

    #[test]
    fn prompt_numbers_spectators_in_join_order() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        post_win_position(&mut engine, &mut host);
        engine.roster.get_mut(1).unwrap().pick_mode = false;

        engine.begin_pick(&mut host, 1);
        assert!(host.calls.contains(&HostCall::Chat("👉 P1 is picking...".into())));
        assert!(host
            .calls
            .contains(&HostCall::ChatTo("#1 - P6, #2 - P7, #3 - P8, #4 - P9".into(), 1)));
    }

    #[test]
    fn regranting_pick_to_same_player_is_quiet() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        post_win_position(&mut engine, &mut host);

        engine.begin_pick(&mut host, 1);
        assert!(!host
            .calls
            .iter()
            .any(|c| matches!(c, HostCall::Chat(text) if text.contains("picking"))));
        // The queue listing still goes out.
        assert!(host
            .calls
            .iter()
            .any(|c| matches!(c, HostCall::ChatTo(_, 1))));
    }

    #[test]
    fn top_fills_every_missing_slot_from_the_front() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        post_win_position(&mut engine, &mut host);

        assert!(engine.handle_pick_answer(&mut host, 1, "top"));
        // Blue needed min(4, |red|) - 1 = 3 players: P6, P7, P8.
        assert_eq!(engine.roster().team_ids(Team::Blue), vec![5, 6, 7, 8]);
        assert!(host.calls.contains(&HostCall::Chat("⬆️ P1 chose top.".into())));
        assert_eq!(engine.roster().current_picker(), None);
    }

    #[test]
    fn bottom_fills_from_the_rear() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        post_win_position(&mut engine, &mut host);

        assert!(engine.handle_pick_answer(&mut host, 1, "bottom"));
        assert_eq!(engine.roster().team_ids(Team::Blue), vec![5, 7, 8, 9]);
        assert!(host.calls.contains(&HostCall::Chat("⬇️ P1 chose bottom.".into())));
    }

    #[test]
    fn number_pick_takes_the_nth_spectator() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        post_win_position(&mut engine, &mut host);

        assert!(engine.handle_pick_answer(&mut host, 1, "2"));
        assert_eq!(engine.roster().get(7).unwrap().team, Team::Blue);
        assert!(host.calls.contains(&HostCall::Chat("➡️ P1 chose P7.".into())));
        // Blue is still short, so the balancer re-grants the pick.
        assert_eq!(engine.roster().current_picker(), Some(1));
    }

    #[test]
    fn out_of_range_number_keeps_the_picker() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        post_win_position(&mut engine, &mut host);

        assert!(engine.handle_pick_answer(&mut host, 1, "12"));
        assert!(host.calls.contains(&HostCall::ChatTo("⚠️ Invalid number.".into(), 1)));
        assert!(engine.roster().get(1).unwrap().pick_mode);
        assert_eq!(engine.roster().team_ids(Team::Blue), vec![5]);

        host.calls.clear();
        assert!(engine.handle_pick_answer(&mut host, 1, "0"));
        assert!(host.calls.contains(&HostCall::ChatTo("⚠️ Invalid number.".into(), 1)));
    }

    #[test]
    fn plain_chat_from_picker_falls_through() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        post_win_position(&mut engine, &mut host);
        assert!(!engine.handle_pick_answer(&mut host, 1, "good game"));
        assert!(engine.roster().get(1).unwrap().pick_mode);
    }

    #[test]
    fn non_picker_answers_are_ignored() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        post_win_position(&mut engine, &mut host);
        assert!(!engine.handle_pick_answer(&mut host, 6, "top"));
        assert_eq!(engine.roster().get(6).unwrap().team, Team::Spectator);
    }
}
