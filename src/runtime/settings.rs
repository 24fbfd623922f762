use std::path::PathBuf;

use local_music::config;

pub fn load_settings(music_dir: Option<PathBuf>) -> config::Settings {
    let mut settings = match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("local-music: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the host from starting.
            eprintln!("local-music: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    };

    if music_dir.is_some() {
        settings.library.music_dir = music_dir;
    }
    settings
}
