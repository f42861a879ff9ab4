use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::desktop::Desktop;

const WEB_SEND_URL: &str = "https://web.whatsapp.com/send";
const WEB_ACCEPT_URL: &str = "https://web.whatsapp.com/accept";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("Country Code Missing in Phone Number!")]
    CountryCodeMissing,
    #[error("image not found: {}", .0.display())]
    ImageNotFound(PathBuf),
    #[error("unsupported image format: {}", .0.display())]
    UnsupportedImage(PathBuf),
    #[error("desktop automation is not supported on {0}")]
    UnsupportedPlatform(&'static str),
    #[error("failed to open {url}: {source}")]
    Browser {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} failed: {reason}")]
    Helper { program: String, reason: String },
}

/// A blocking "send now" operation. Implementations may take tens of seconds,
/// callers on an async runtime must move the call off the reactor.
pub trait WhatsAppSender: Send + Sync + 'static {
    fn send_text(&self, phone: &str, message: &str) -> Result<(), SendError>;

    fn send_image(&self, phone: &str, img_path: &str, caption: &str) -> Result<(), SendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Time given to WhatsApp Web to load the chat before sending.
    pub wait_time: Duration,
    pub tab_close: bool,
    /// Delay between sending and closing the tab.
    pub close_time: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            wait_time: Duration::from_secs(20),
            tab_close: true,
            close_time: Duration::from_secs(5),
        }
    }
}

/// Sends messages by driving a WhatsApp Web tab in the desktop browser.
pub struct BrowserSender<D> {
    desktop: D,
    timing: Timing,
    // one keystroke sequence at a time per desktop session
    session: Mutex<()>,
}

impl<D: Desktop> BrowserSender<D> {
    pub fn new(desktop: D, timing: Timing) -> Self {
        Self {
            desktop,
            timing,
            session: Mutex::new(()),
        }
    }

    /// Opens `url`, waits for the chat to load, runs `act` and closes the tab,
    /// also when `act` fails.
    fn in_tab(
        &self,
        url: &str,
        act: impl FnOnce() -> Result<(), SendError>,
    ) -> Result<(), SendError> {
        debug!("Opening {}", url);
        self.desktop.open_url(url)?;
        thread::sleep(self.timing.wait_time);

        match act() {
            Ok(()) => self.finish(),
            Err(err) => {
                if self.timing.tab_close {
                    if let Err(close_err) = self.desktop.close_tab() {
                        warn!("Failed to close tab after error: {}", close_err);
                    }
                }
                Err(err)
            }
        }
    }

    fn finish(&self) -> Result<(), SendError> {
        if self.timing.tab_close {
            thread::sleep(self.timing.close_time);
            self.desktop.close_tab()?;
        }
        Ok(())
    }
}

impl<D: Desktop> WhatsAppSender for BrowserSender<D> {
    fn send_text(&self, phone: &str, message: &str) -> Result<(), SendError> {
        let recipient = Recipient::parse(phone)?;
        let url = match recipient {
            Recipient::Phone(number) => text_url(number, message),
            Recipient::Group(_) => recipient.chat_url(),
        };

        let _session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        self.in_tab(&url, || {
            // invite links carry no prefilled text
            if let Recipient::Group(_) = recipient {
                self.desktop.type_text(message)?;
            }
            self.desktop.press_enter()
        })?;
        info!("Text handed to WhatsApp Web for {}", phone);
        Ok(())
    }

    fn send_image(&self, phone: &str, img_path: &str, caption: &str) -> Result<(), SendError> {
        let recipient = Recipient::parse(phone)?;
        let path = check_image(Path::new(img_path))?;

        let _session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        self.in_tab(&recipient.chat_url(), || {
            self.desktop.paste_image(&path)?;
            if !caption.is_empty() {
                self.desktop.type_text(caption)?;
            }
            self.desktop.press_enter()
        })?;
        info!("Image {} handed to WhatsApp Web for {}", path.display(), phone);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recipient<'a> {
    /// Individual number with a `+` country code.
    Phone(&'a str),
    /// Group invite code, marked by a `_`.
    Group(&'a str),
}

impl<'a> Recipient<'a> {
    fn parse(id: &'a str) -> Result<Self, SendError> {
        if id.contains('+') {
            Ok(Self::Phone(id))
        } else if id.contains('_') {
            Ok(Self::Group(id))
        } else {
            Err(SendError::CountryCodeMissing)
        }
    }

    fn chat_url(&self) -> String {
        match self {
            Self::Phone(number) => {
                format!("{}?phone={}", WEB_SEND_URL, urlencoding::encode(number))
            }
            Self::Group(code) => format!("{}?code={}", WEB_ACCEPT_URL, urlencoding::encode(code)),
        }
    }
}

fn check_image(path: &Path) -> Result<PathBuf, SendError> {
    if !path.is_file() {
        return Err(SendError::ImageNotFound(path.to_path_buf()));
    }
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false);
    if !supported {
        return Err(SendError::UnsupportedImage(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

fn text_url(number: &str, message: &str) -> String {
    format!(
        "{}&text={}",
        Recipient::Phone(number).chat_url(),
        urlencoding::encode(message)
    )
}
