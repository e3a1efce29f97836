//! Last-touch tracking and goal attribution.

use crate::host::Disc;
use crate::player::{PlayerId, Team};
use crate::roster::Roster;

/// Margin added to the sum of radii when detecting ball contact.
pub const CONTACT_MARGIN: f64 = 0.01;

/// The last two distinct players to contact the ball.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TouchHistory {
    last: Option<PlayerId>,
    prior: Option<PlayerId>,
}

impl TouchHistory {
    /// Shifts the history when the contact comes from a new player.
    /// Repeated contact by the current last toucher is a no-op, so the
    /// two slots always hold distinct players once both are set.
    pub fn record(&mut self, id: PlayerId) {
        if self.last != Some(id) {
            self.prior = self.last;
            self.last = Some(id);
        }
    }

    /// Cleared whenever a match stops.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn last(&self) -> Option<PlayerId> {
        self.last
    }

    pub fn prior(&self) -> Option<PlayerId> {
        self.prior
    }
}

/// Whether a player disc is touching the ball.
pub fn in_contact(player: &Disc, ball: &Disc) -> bool {
    player.distance_to(ball) < player.radius + ball.radius + CONTACT_MARGIN
}

/// Converts the ball's velocity into the announced km/h figure.
/// The coefficient matches the host's damping model: 100 / (5 * (0.99^60 + 1)).
pub fn ball_speed_kmh(ball: &Disc) -> f64 {
    ball.speed() * (100.0 / (5.0 * (0.99_f64.powi(60) + 1.0)))
}

/// Outcome of attributing a goal to the touch history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalAttribution {
    /// Last toucher unknown or no longer on a team.
    Unattributed,
    OwnGoal { scorer: PlayerId },
    Scored {
        scorer: PlayerId,
        assist: Option<PlayerId>,
    },
}

/// Resolves who scored, using the roster as it stands when the goal fires.
pub fn attribute_goal(
    touch: &TouchHistory,
    roster: &Roster,
    scoring_team: Team,
) -> GoalAttribution {
    let Some(scorer) = touch.last().and_then(|id| roster.get(id)) else {
        return GoalAttribution::Unattributed;
    };
    if !scorer.team.is_playing() {
        return GoalAttribution::Unattributed;
    }
    if scorer.team != scoring_team {
        return GoalAttribution::OwnGoal { scorer: scorer.id };
    }
    let assist = touch
        .prior()
        .and_then(|id| roster.get(id))
        .filter(|p| p.team == scoring_team)
        .map(|p| p.id);
    GoalAttribution::Scored {
        scorer: scorer.id,
        assist,
    }
}
