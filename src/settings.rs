use std::path::PathBuf;

/// Feature toggles for one session, the rough equivalent of a client's
/// cosmetic settings page. Passed explicitly to whoever needs them;
/// nothing reads globals.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Simulate the companion pet at all.
    pub pet_enabled: bool,
    /// Pet may throw an angry fit after idling too long.
    pub reactive_pet: bool,
    /// Emit the pet-to-target debug line.
    pub sight_line: bool,
    /// Trail puffs behind the chasing pet.
    pub pet_trail: bool,
    pub pet_trail_radius: f32,
    /// RGBA packed as u32.
    pub pet_trail_color: u32,
    /// Trail puffs behind the moving player.
    pub player_trail: bool,
    pub player_trail_radius: f32,
    pub player_trail_color: u32,
    /// Per-tick sparkle scatter around the player.
    pub scatter_sparkles: bool,
    pub scatter_radius: f32,
    /// Timer-gated sparkle bursts around the player.
    pub pulse_sparkles: bool,
    pub pulse_radius: f32,
    /// Record player frames during the session.
    pub recording: bool,
    /// Where session records are written. None keeps them in memory only.
    pub records_dir: Option<PathBuf>,
    /// Map name the session's record file is keyed by.
    pub map_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pet_enabled: true,
            reactive_pet: false,
            sight_line: true,
            pet_trail: true,
            pet_trail_radius: 16.0,
            pet_trail_color: 0x6688CCCC, // soft blue
            player_trail: true,
            player_trail_radius: 20.0,
            player_trail_color: 0xFFAA33DD, // orange-yellow
            scatter_sparkles: false,
            scatter_radius: 50.0,
            pulse_sparkles: false,
            pulse_radius: 80.0,
            recording: false,
            records_dir: None,
            map_name: "scripted_session".to_string(),
        }
    }
}
