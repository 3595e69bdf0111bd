pub mod leveling {

    /// Experience required to advance from `level` to `level + 1` is
    /// `level * EXP_PER_LEVEL`.
    pub const EXP_PER_LEVEL: i32 = 1000;
}

pub mod battle {

    pub const BASE_PLAYER_HP: i32 = 100;

    pub const PLAYER_HP_PER_LEVEL: i32 = 10;

    pub const MAX_TURNS: u32 = 20;

    /// A skill attack doubles its damage when the crit roll exceeds this.
    pub const SKILL_CRIT_FLOOR: f64 = 0.3;
}

pub mod rewards {

    /// Attempts for the guarded (level, exp) update before giving up.
    pub const EXP_UPDATE_RETRIES: u32 = 5;
}

pub mod limits {

    pub const DEFAULT_PAGE_SIZE: u64 = 25;

    pub const MAX_PAGE_SIZE: u64 = 100;

    pub const MAX_ACTIVITY_PAGE_SIZE: u64 = 200;
}
