use std::process::{Command, Output};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const WIDTH: u32 = 100;
const HEIGHT: u32 = 30;

/// Runs the binary in a detached tmux session and scrapes its screen.
pub struct TmuxHarness {
    session_name: String,
}

/// Run `tmux <args>` outside any enclosing session.
fn tmux(args: &[&str]) -> Result<Output, String> {
    Command::new("tmux")
        .args(args)
        .env_remove("TMUX")
        .output()
        .map_err(|e| format!("tmux {}: {}", args.first().unwrap_or(&""), e))
}

impl TmuxHarness {
    pub fn new(test_name: &str) -> Self {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self {
            session_name: format!("solfa-{}-{}", test_name, stamp),
        }
    }

    /// Start `command` in a new session and give it a second to draw.
    pub fn start(&self, command: &str) -> Result<(), String> {
        // Env vars go on the command line because the tmux server spawns
        // children in its own environment. A missing sample dir keeps runs
        // independent of the user's library.
        let wrapped = format!("SOLFA_SAMPLES_DIR=/nonexistent {}", command);
        let (w, h) = (WIDTH.to_string(), HEIGHT.to_string());
        let out = tmux(&["new-session", "-d", "-s", &self.session_name, "-x", &w, "-y", &h, &wrapped])?;
        if !out.status.success() {
            return Err("tmux new-session failed".to_string());
        }
        thread::sleep(Duration::from_millis(1000));
        Ok(())
    }

    pub fn send_keys(&self, keys: &[&str]) -> Result<(), String> {
        for key in keys {
            let out = tmux(&["send-keys", "-t", &self.session_name, key])?;
            if !out.status.success() {
                return Err(format!("tmux send-keys failed for key: {}", key));
            }
            thread::sleep(Duration::from_millis(50));
        }
        thread::sleep(Duration::from_millis(100));
        Ok(())
    }

    pub fn send_key(&self, key: &str) -> Result<(), String> {
        self.send_keys(&[key])
    }

    pub fn capture_screen(&self) -> Result<String, String> {
        let out = tmux(&["capture-pane", "-t", &self.session_name, "-p"])?;
        if !out.status.success() {
            return Err("tmux capture-pane failed".to_string());
        }
        String::from_utf8(out.stdout).map_err(|e| format!("screen is not UTF-8: {}", e))
    }

    pub fn assert_screen_contains(&self, text: &str) -> Result<(), String> {
        let screen = self.capture_screen()?;
        if screen.contains(text) {
            Ok(())
        } else {
            Err(format!("expected '{}' on screen:\n{}", text, screen))
        }
    }

    pub fn is_running(&self) -> bool {
        tmux(&["has-session", "-t", &self.session_name])
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    pub fn wait_for_exit(&self, timeout: Duration) -> Result<(), String> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if !self.is_running() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(100));
        }
        Err("timed out waiting for exit".to_string())
    }
}

impl Drop for TmuxHarness {
    fn drop(&mut self) {
        let _ = tmux(&["kill-session", "-t", &self.session_name]);
    }
}
