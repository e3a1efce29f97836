//! Idle enforcement, driven by the once-per-second pass.

use super::RoomEngine;
use crate::host::HostControl;

impl RoomEngine {
    pub(super) fn run_activity_pass(&mut self, host: &mut dyn HostControl) {
        for player in self.roster.iter_mut() {
            if !player.afk {
                continue;
            }
            player.afk_idle_secs += 1;
            let remaining = match player.afk_idle_secs {
                300 => "two minutes",
                360 => "one minute",
                390 => "30 seconds",
                410 => "10 seconds",
                secs if secs >= 420 => {
                    host.kick_player(player.id, "AFK limit reached (7 minutes)");
                    continue;
                }
                _ => continue,
            };
            host.send_chat_to(
                &format!(
                    "⚠️ Hey {}, if you don't give a sign of life within {remaining} you'll be kicked.",
                    player.name
                ),
                player.id,
            );
        }

        // Team players must keep moving during a scored match.
        if self.rules.dev_mode || host.elapsed_secs().is_none() || host.score_limit() == 0 {
            return;
        }
        for player in self.roster.iter_mut() {
            if !player.team.is_playing() {
                continue;
            }
            player.match_idle_secs += 1;
            let remaining = match player.match_idle_secs {
                8 => "7 seconds",
                10 => "5 seconds",
                secs if secs >= 15 => {
                    host.kick_player(player.id, "AFK");
                    continue;
                }
                _ => continue,
            };
            host.send_chat_to(
                &format!(
                    "⚠️ Hey {}, if you don't give a sign of life within {remaining} you'll be kicked.",
                    player.name
                ),
                player.id,
            );
        }
    }
}
