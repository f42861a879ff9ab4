use std::path::Path;
use std::process::Command;

use log::debug;

use crate::whatsapp::SendError;

/// The OS-level actions needed to drive a WhatsApp Web tab.
pub trait Desktop: Send + Sync + 'static {
    fn open_url(&self, url: &str) -> Result<(), SendError>;

    fn press_enter(&self) -> Result<(), SendError>;

    fn close_tab(&self) -> Result<(), SendError>;

    /// Put the image on the clipboard and paste it into the focused chat.
    fn paste_image(&self, path: &Path) -> Result<(), SendError>;

    fn type_text(&self, text: &str) -> Result<(), SendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Platform {
    /// X11 session driven through xdotool and xclip.
    Linux,
    /// System Events driven through osascript.
    MacOS,
    Other(&'static str),
}

impl Platform {
    fn detect() -> Self {
        match std::env::consts::OS {
            "linux" => Self::Linux,
            "macos" => Self::MacOS,
            other => Self::Other(other),
        }
    }
}

/// The desktop of the machine the service runs on.
pub struct SystemDesktop {
    platform: Platform,
}

impl SystemDesktop {
    pub fn new() -> Self {
        Self {
            platform: Platform::detect(),
        }
    }

    fn key(&self, xdotool_key: &str, apple_script: &str) -> Result<(), SendError> {
        match self.platform {
            Platform::Linux => run("xdotool", &["key", xdotool_key]),
            Platform::MacOS => run("osascript", &["-e", apple_script]),
            Platform::Other(os) => Err(SendError::UnsupportedPlatform(os)),
        }
    }
}

impl Default for SystemDesktop {
    fn default() -> Self {
        Self::new()
    }
}

impl Desktop for SystemDesktop {
    fn open_url(&self, url: &str) -> Result<(), SendError> {
        open::that(url).map_err(|source| SendError::Browser {
            url: url.to_string(),
            source,
        })
    }

    fn press_enter(&self) -> Result<(), SendError> {
        self.key(
            "Return",
            r#"tell application "System Events" to key code 36"#,
        )
    }

    fn close_tab(&self) -> Result<(), SendError> {
        self.key(
            "ctrl+w",
            r#"tell application "System Events" to keystroke "w" using command down"#,
        )
    }

    fn paste_image(&self, path: &Path) -> Result<(), SendError> {
        let path_str = path.to_string_lossy();
        match self.platform {
            Platform::Linux => {
                run(
                    "xclip",
                    &[
                        "-selection",
                        "clipboard",
                        "-t",
                        image_mime(path),
                        "-i",
                        &*path_str,
                    ],
                )?;
                run("xdotool", &["key", "ctrl+v"])
            }
            Platform::MacOS => {
                let script = format!(
                    "set the clipboard to (read (POSIX file \"{}\") as {})",
                    apple_escape(&path_str),
                    apple_picture_class(path)
                );
                run("osascript", &["-e", &script])?;
                run(
                    "osascript",
                    &[
                        "-e",
                        r#"tell application "System Events" to keystroke "v" using command down"#,
                    ],
                )
            }
            Platform::Other(os) => Err(SendError::UnsupportedPlatform(os)),
        }
    }

    fn type_text(&self, text: &str) -> Result<(), SendError> {
        match self.platform {
            Platform::Linux => run("xdotool", &["type", "--delay", "12", "--", text]),
            Platform::MacOS => {
                let script = format!(
                    "tell application \"System Events\" to keystroke \"{}\"",
                    apple_escape(text)
                );
                run("osascript", &["-e", &script])
            }
            Platform::Other(os) => Err(SendError::UnsupportedPlatform(os)),
        }
    }
}

fn run(program: &str, args: &[&str]) -> Result<(), SendError> {
    debug!("Running {} {:?}", program, args);
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| SendError::Helper {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let reason = match stderr.trim() {
        "" => output.status.to_string(),
        msg => msg.to_string(),
    };
    Err(SendError::Helper {
        program: program.to_string(),
        reason,
    })
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

fn image_mime(path: &Path) -> &'static str {
    match extension(path).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => "image/png",
    }
}

fn apple_picture_class(path: &Path) -> &'static str {
    match extension(path).as_str() {
        "jpg" | "jpeg" => "JPEG picture",
        "gif" => "GIF picture",
        _ => "«class PNGf»",
    }
}

fn apple_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
