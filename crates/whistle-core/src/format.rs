//! Arena profiles and the headcount tables that select them.

/// Named arena bundled with its score/time limits. Selected solely
/// from the active-player count; switching profile requires stopping
/// any running match first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatProfile {
    pub name: &'static str,
    pub team_capacity: usize,
    pub score_limit: u32,
    /// Minutes; 0 disables the clock.
    pub time_limit: u32,
    /// Stadium payload handed verbatim to the host.
    pub stadium: &'static str,
}

impl FormatProfile {
    /// Score limit after the development-mode override (1 instead of 3).
    /// Unlimited formats stay unlimited.
    pub fn effective_score_limit(&self, dev_mode: bool) -> u32 {
        if self.score_limit == 0 {
            0
        } else if dev_mode {
            1
        } else {
            self.score_limit
        }
    }
}

pub const TRAINING: FormatProfile = FormatProfile {
    name: "training",
    team_capacity: 1,
    score_limit: 0,
    time_limit: 0,
    stadium: TRAINING_STADIUM,
};

pub const SMALL: FormatProfile = FormatProfile {
    name: "small",
    team_capacity: 2,
    score_limit: 3,
    time_limit: 3,
    stadium: SMALL_STADIUM,
};

pub const MEDIUM: FormatProfile = FormatProfile {
    name: "medium",
    team_capacity: 3,
    score_limit: 3,
    time_limit: 3,
    stadium: MEDIUM_STADIUM,
};

pub const BIG: FormatProfile = FormatProfile {
    name: "big",
    team_capacity: 4,
    score_limit: 3,
    time_limit: 3,
    stadium: BIG_STADIUM,
};

/// Target profile for two or more active players.
pub fn profile_for(active: usize) -> &'static FormatProfile {
    if active >= 8 {
        &BIG
    } else if active >= 6 {
        &MEDIUM
    } else {
        &SMALL
    }
}

/// Max players per team for an active headcount.
pub fn team_capacity(active: usize, default_capacity: usize) -> usize {
    match active {
        1..=3 => 1,
        4..=5 => 2,
        6..=7 => 3,
        _ => default_capacity,
    }
}

const TRAINING_STADIUM: &str = r#"{"name":"training","width":420,"height":200,"spawnDistance":170,"bg":{"type":"grass","width":370,"height":170,"kickOffRadius":75},"goals":[]}"#;

const SMALL_STADIUM: &str = r#"{"name":"small","width":420,"height":200,"spawnDistance":180,"bg":{"type":"grass","width":370,"height":170,"kickOffRadius":75},"goals":[{"p0":[-370,-64],"p1":[-370,64],"team":"red"},{"p0":[370,-64],"p1":[370,64],"team":"blue"}]}"#;

const MEDIUM_STADIUM: &str = r#"{"name":"medium","width":600,"height":270,"spawnDistance":240,"bg":{"type":"grass","width":550,"height":240,"kickOffRadius":80},"goals":[{"p0":[-550,-80],"p1":[-550,80],"team":"red"},{"p0":[550,-80],"p1":[550,80],"team":"blue"}]}"#;

const BIG_STADIUM: &str = r#"{"name":"big","width":770,"height":350,"spawnDistance":300,"bg":{"type":"grass","width":700,"height":320,"kickOffRadius":90},"goals":[{"p0":[-700,-90],"p1":[-700,90],"team":"red"},{"p0":[700,-90],"p1":[700,90],"team":"blue"}]}"#;
