use crate::error::CapabilityError;
use crate::host::{FileManager, MusicPlayer};

/// Music player widget state.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub enabled: bool,
    pub playing: bool,
    pub muted: bool,
    pub volume: f32,
    pub track: usize,
    pub tracks: Vec<String>,
    pub playlist_open: bool,
    /// When set, every command fails with this message.
    pub failure: Option<String>,
}

impl Player {
    pub fn new(tracks: &[&str]) -> Self {
        Self {
            enabled: true,
            playing: false,
            muted: false,
            volume: 0.5,
            track: 0,
            tracks: tracks.iter().map(|t| t.to_string()).collect(),
            playlist_open: false,
            failure: None,
        }
    }

    pub fn current_track(&self) -> Option<&str> {
        self.tracks.get(self.track).map(String::as_str)
    }

    fn check(&self) -> Result<(), CapabilityError> {
        match &self.failure {
            Some(msg) => Err(CapabilityError::failed(msg.clone())),
            None => Ok(()),
        }
    }
}

impl MusicPlayer for Player {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn toggle_play(&mut self) -> Result<bool, CapabilityError> {
        self.check()?;
        self.playing = !self.playing;
        Ok(self.playing)
    }

    fn play_previous(&mut self) -> Result<(), CapabilityError> {
        self.check()?;
        if !self.tracks.is_empty() {
            self.track = (self.track + self.tracks.len() - 1) % self.tracks.len();
        }
        Ok(())
    }

    fn play_next(&mut self) -> Result<(), CapabilityError> {
        self.check()?;
        if !self.tracks.is_empty() {
            self.track = (self.track + 1) % self.tracks.len();
        }
        Ok(())
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), CapabilityError> {
        self.check()?;
        self.volume = volume.clamp(0.0, 1.0);
        Ok(())
    }

    fn toggle_mute(&mut self) -> Result<bool, CapabilityError> {
        self.check()?;
        self.muted = !self.muted;
        Ok(self.muted)
    }

    fn toggle_playlist(&mut self) -> Result<(), CapabilityError> {
        self.check()?;
        self.playlist_open = !self.playlist_open;
        Ok(())
    }
}

/// File manager panel of the admin dashboard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileBrowser {
    pub cwd: Vec<String>,
    pub opened: Vec<String>,
    pub rename_requests: usize,
    pub delete_requests: usize,
    pub reloads: usize,
    pub failure: Option<String>,
}

impl FileBrowser {
    pub fn path(&self) -> String {
        format!("/{}", self.cwd.join("/"))
    }

    fn check(&self) -> Result<(), CapabilityError> {
        match &self.failure {
            Some(msg) => Err(CapabilityError::failed(msg.clone())),
            None => Ok(()),
        }
    }
}

impl FileManager for FileBrowser {
    fn open_file(&mut self, path: &str) -> Result<(), CapabilityError> {
        self.check()?;
        if let Some(dir) = path.strip_suffix('/') {
            self.cwd.push(dir.rsplit('/').next().unwrap_or(dir).to_string());
        } else {
            self.opened.push(path.to_string());
        }
        Ok(())
    }

    fn go_back(&mut self) -> Result<(), CapabilityError> {
        self.check()?;
        self.cwd.pop();
        Ok(())
    }

    fn open_rename_modal(&mut self) -> Result<(), CapabilityError> {
        self.check()?;
        self.rename_requests += 1;
        Ok(())
    }

    fn open_delete_modal(&mut self) -> Result<(), CapabilityError> {
        self.check()?;
        self.delete_requests += 1;
        Ok(())
    }

    fn load_files(&mut self) -> Result<(), CapabilityError> {
        self.check()?;
        self.reloads += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_wraps_tracks() {
        let mut player = Player::new(&["a", "b", "c"]);
        player.play_previous().unwrap();
        assert_eq!(player.current_track(), Some("c"));
        player.play_next().unwrap();
        assert_eq!(player.current_track(), Some("a"));
    }

    #[test]
    fn test_player_failure() {
        let mut player = Player::new(&["a"]);
        player.failure = Some("audio device lost".into());
        assert_eq!(
            player.toggle_play(),
            Err(CapabilityError::Failed("audio device lost".into()))
        );
        assert!(!player.playing);
    }

    #[test]
    fn test_browser_enters_directories() {
        let mut files = FileBrowser::default();
        files.open_file("/docs/").unwrap();
        files.open_file("/docs/readme.md").unwrap();
        assert_eq!(files.path(), "/docs");
        assert_eq!(files.opened, vec!["/docs/readme.md".to_string()]);
        files.go_back().unwrap();
        assert_eq!(files.path(), "/");
    }
}
