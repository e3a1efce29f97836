//! Goal announcements and match-end resolution.

use tracing::info;

use super::RoomEngine;
use crate::format;
use crate::host::HostControl;
use crate::player::{PlayerId, Team};
use crate::touch::{GoalAttribution, attribute_goal, ball_speed_kmh};

impl RoomEngine {
    pub fn on_team_goal(&mut self, host: &mut dyn HostControl, team: Team) {
        if !team.is_playing() {
            return;
        }
        let speed = host.ball().map(|b| ball_speed_kmh(&b)).unwrap_or(0.0);
        let message = match attribute_goal(&self.touch, &self.roster, team) {
            GoalAttribution::Unattributed => match team {
                Team::Red => format!("🔴 Red team scored ({speed:.2}km/h)."),
                _ => format!("🔵 Blue team scored ({speed:.2}km/h)."),
            },
            GoalAttribution::OwnGoal { scorer } => {
                format!("😂 Own goal by {} ({speed:.2}km/h).", self.display_name(scorer))
            }
            GoalAttribution::Scored { scorer, assist } => {
                let badge = if team == Team::Red { "🔴" } else { "🔵" };
                let scorer = self.display_name(scorer);
                match assist {
                    Some(assist) => format!(
                        "{badge} Goal by {scorer}, assisted by {} ({speed:.2}km/h).",
                        self.display_name(assist)
                    ),
                    None => format!("{badge} Goal by {scorer} ({speed:.2}km/h)."),
                }
            }
        };
        host.send_chat(&message);
    }

    /// Ends the match once the clock or a score limit says so: the
    /// losing team clears out, the winner holds the hill, and the
    /// balancer refills the other side.
    pub(super) fn check_ended_match(&mut self, host: &mut dyn HostControl) {
        let Some(elapsed) = host.elapsed_secs() else {
            return;
        };
        let (red_score, blue_score) = host.scores();
        let time_limit = host.time_limit();
        let score_limit = host.score_limit();

        let time_up =
            time_limit != 0 && elapsed > f64::from(time_limit * 60) && red_score != blue_score;
        let score_hit =
            score_limit != 0 && (red_score >= score_limit || blue_score >= score_limit);
        if !time_up && !score_hit {
            return;
        }

        let capacity =
            format::team_capacity(self.roster.active_count(), self.rules.default_team_capacity);
        if red_score > blue_score {
            for id in self.roster.team_ids(Team::Blue).into_iter().rev() {
                self.set_team(host, id, Team::Spectator);
            }
            host.send_chat(&format!("🔴 Red team won the match {red_score}-{blue_score}."));
            if capacity == 4 {
                self.current_streak += 1;
                host.send_chat(&format!("🔥 Current streak: {}.", self.current_streak));
            }
        } else {
            // Blue takes the hill: it moves to RED for the next match.
            for id in self.roster.team_ids(Team::Red).into_iter().rev() {
                self.set_team(host, id, Team::Spectator);
            }
            for id in self.roster.team_ids(Team::Blue) {
                self.set_team(host, id, Team::Red);
            }
            host.send_chat(&format!("🔵 Blue team won the match {blue_score}-{red_score}."));
            if capacity == 4 {
                self.current_streak = 1;
                host.send_chat(&format!("🔥 Current streak: {}.", self.current_streak));
            }
        }
        info!(
            room = %self.rules.room_name,
            red = red_score,
            blue = blue_score,
            streak = self.current_streak,
            "match ended"
        );
        host.stop_game();
        self.check_matchmaking(host);
    }

    fn display_name(&self, id: PlayerId) -> String {
        self.roster
            .get(id)
            .map_or_else(|| format!("#{id}"), |p| p.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{RoomEngine, RoomRules};
    use crate::host::Disc;
    use crate::player::Team;
    use crate::test_helpers::{FakeHost, HostCall, snapshot};

    fn engine() -> RoomEngine {
        RoomEngine::new(RoomRules {
            room_name: "scoring".into(),
            default_team_capacity: 4,
            dev_mode: false,
        })
    }

    fn still_ball() -> Disc {
        Disc {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            radius: 10.0,
        }
    }

    fn teams(engine: &mut RoomEngine, red: &[u32], blue: &[u32], spectators: &[u32]) {
        for &id in red.iter().chain(blue).chain(spectators) {
            engine.roster.add(snapshot(id, &format!("P{id}")));
        }
        for &id in red {
            engine.roster.get_mut(id).unwrap().team = Team::Red;
        }
        for &id in blue {
            engine.roster.get_mut(id).unwrap().team = Team::Blue;
        }
    }

    #[test]
    fn goal_credits_scorer_and_assist() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        teams(&mut engine, &[1, 2], &[3, 4], &[]);
        host.ball = Some(still_ball());

        engine.on_ball_kick(2);
        engine.on_ball_kick(1);
        engine.on_team_goal(&mut host, Team::Red);
        assert!(host
            .calls
            .contains(&HostCall::Chat("🔴 Goal by P1, assisted by P2 (0.00km/h).".into())));
    }

    #[test]
    fn wrong_side_touch_is_an_own_goal() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        teams(&mut engine, &[1], &[2], &[]);
        host.ball = Some(still_ball());

        engine.on_ball_kick(2);
        engine.on_team_goal(&mut host, Team::Red);
        assert!(host
            .calls
            .contains(&HostCall::Chat("😂 Own goal by P2 (0.00km/h).".into())));
    }

    #[test]
    fn untouched_goal_credits_the_team() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        teams(&mut engine, &[1], &[2], &[]);
        host.ball = Some(still_ball());

        engine.on_team_goal(&mut host, Team::Blue);
        assert!(host
            .calls
            .contains(&HostCall::Chat("🔵 Blue team scored (0.00km/h).".into())));
    }

    #[test]
    fn red_win_keeps_the_hill_and_builds_a_streak() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        // Nine actives resolve to capacity 4, the streak format.
        teams(&mut engine, &[1, 2, 3, 4], &[5, 6, 7, 8], &[9]);
        host.stadium = "big".to_string();
        host.elapsed = Some(100.0);
        host.score_limit = 3;
        host.time_limit = 3;
        host.red_score = 3;
        host.blue_score = 0;

        engine.check_ended_match(&mut host);

        assert!(host
            .calls
            .contains(&HostCall::Chat("🔴 Red team won the match 3-0.".into())));
        assert!(host
            .calls
            .contains(&HostCall::Chat("🔥 Current streak: 1.".into())));
        assert_eq!(engine.current_streak(), 1);
        assert_eq!(engine.roster().team_ids(Team::Red), vec![1, 2, 3, 4]);
        // Losers demoted newest-first, then the balancer refills.
        let demotion_order: Vec<u32> = host
            .calls
            .iter()
            .filter_map(|c| match c {
                HostCall::SetPlayerTeam(id, Team::Spectator) => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(demotion_order, vec![8, 7, 6, 5]);
        // Red's captain now picks blue's replacements.
        assert_eq!(engine.roster().current_picker(), Some(1));
    }

    #[test]
    fn consecutive_red_wins_extend_the_streak() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        teams(&mut engine, &[1, 2, 3, 4], &[5, 6, 7, 8], &[9]);
        host.stadium = "big".to_string();
        host.score_limit = 3;
        host.time_limit = 3;

        for expected in 1..=2u32 {
            host.elapsed = Some(100.0);
            host.red_score = 3;
            host.blue_score = 1;
            engine.check_ended_match(&mut host);
            assert_eq!(engine.current_streak(), expected);

            // Refill blue for the next round.
            for id in engine.roster().spectator_queue() {
                engine.roster.get_mut(id).unwrap().team = Team::Blue;
                engine.roster.get_mut(id).unwrap().pick_mode = false;
            }
            engine.roster.clear_pick_flags();
        }
    }

    #[test]
    fn blue_win_takes_over_red_and_resets_the_streak() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        teams(&mut engine, &[1, 2, 3, 4], &[5, 6, 7, 8], &[9]);
        host.stadium = "big".to_string();
        host.elapsed = Some(100.0);
        host.score_limit = 3;
        host.time_limit = 3;
        host.red_score = 1;
        host.blue_score = 3;
        engine.current_streak = 5;

        engine.check_ended_match(&mut host);

        assert!(host
            .calls
            .contains(&HostCall::Chat("🔵 Blue team won the match 3-1.".into())));
        assert_eq!(engine.current_streak(), 1);
        // The winners occupy RED for the next match.
        assert_eq!(engine.roster().team_ids(Team::Red), vec![5, 6, 7, 8]);
    }

    #[test]
    fn no_streak_outside_capacity_four() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        // Five actives resolve to capacity 2.
        teams(&mut engine, &[1, 2], &[3, 4], &[5]);
        host.stadium = "small".to_string();
        host.elapsed = Some(100.0);
        host.score_limit = 3;
        host.time_limit = 3;
        host.red_score = 3;
        host.blue_score = 0;

        engine.check_ended_match(&mut host);
        assert_eq!(engine.current_streak(), 0);
        assert!(!host
            .calls
            .iter()
            .any(|c| matches!(c, HostCall::Chat(text) if text.contains("streak"))));
    }

    #[test]
    fn time_limit_needs_a_score_difference() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        teams(&mut engine, &[1, 2], &[3, 4], &[5]);
        host.stadium = "small".to_string();
        host.elapsed = Some(200.0);
        host.score_limit = 3;
        host.time_limit = 3;
        host.red_score = 1;
        host.blue_score = 1;

        engine.check_ended_match(&mut host);
        assert_eq!(host.elapsed, Some(200.0), "tied match plays on");

        host.red_score = 2;
        engine.check_ended_match(&mut host);
        assert!(host.calls.contains(&HostCall::StopGame));
    }

    #[test]
    fn overshot_score_still_ends_the_match() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        teams(&mut engine, &[1, 2], &[3, 4], &[5]);
        host.stadium = "small".to_string();
        host.elapsed = Some(50.0);
        host.score_limit = 3;
        host.time_limit = 3;
        host.red_score = 4;
        host.blue_score = 1;

        engine.check_ended_match(&mut host);
        assert!(host.calls.contains(&HostCall::StopGame));
        assert!(host
            .calls
            .contains(&HostCall::Chat("🔴 Red team won the match 4-1.".into())));
    }

    #[test]
    fn mid_match_scores_do_not_end_anything() {
        let mut engine = engine();
        let mut host = FakeHost::new();
        teams(&mut engine, &[1, 2], &[3, 4], &[5]);
        host.stadium = "small".to_string();
        host.elapsed = Some(50.0);
        host.score_limit = 3;
        host.time_limit = 3;
        host.red_score = 2;
        host.blue_score = 1;

        engine.check_ended_match(&mut host);
        assert!(host.calls.is_empty());
    }
}
