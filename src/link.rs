//! The link from the USB host bridge.
//!
//! The keyboard itself is attached to a small USB host bridge, which forwards each boot protocol
//! report over a UART as a frame:
//!
//! ```text
//! 0x7e  kind  payload...  crc-lo  crc-hi
//! ```
//!
//! The kind says how long the payload is, so the start byte may also show up inside a frame.
//! The CRC is CRC-16/IBM-SDLC over the kind and the payload.  Anything that doesn't check out is
//! logged and dropped, and decoding picks up again at the next start byte.

use arrayvec::ArrayVec;
use crc::{Crc, CRC_16_IBM_SDLC};

use crate::log::{debug, info, warn};
use crate::report::{KeyReport, KeyReportSource, REPORT_SIZE};

/// Start of every frame.
pub const SOF: u8 = 0x7e;

/// A keyboard report, the 8 bytes of the boot report follow.
pub const KIND_REPORT: u8 = 0x01;

/// The keyboard was unplugged.  No payload.
pub const KIND_DETACH: u8 = 0x02;

/// UART speed of the link.
pub const LINK_BAUD: u32 = 115_200;

/// The CRC generator we are using.
pub const CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_SDLC);

/// Longest frame on the wire.
pub const MAX_FRAME: usize = 2 + REPORT_SIZE + 2;

/// Something that came over the link.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    Report(KeyReport),
    Detach,
}

impl LinkEvent {
    fn kind(&self) -> u8 {
        match self {
            LinkEvent::Report(_) => KIND_REPORT,
            LinkEvent::Detach => KIND_DETACH,
        }
    }

    /// Encode this event as a frame.  This is what the bridge sends.
    pub fn encode(&self) -> ArrayVec<u8, MAX_FRAME> {
        let mut frame = ArrayVec::new();
        frame.push(SOF);
        frame.push(self.kind());
        if let LinkEvent::Report(report) = self {
            frame.push(report.modifiers.bits());
            frame.push(0);
            for &key in &report.keys {
                frame.push(key);
            }
        }
        let crc = CRC.checksum(&frame[1..]);
        for byte in crc.to_le_bytes() {
            frame.push(byte);
        }
        frame
    }
}

/// Payload length for each kind, `None` for kinds we don't know.
fn payload_len(kind: u8) -> Option<usize> {
    match kind {
        KIND_REPORT => Some(REPORT_SIZE),
        KIND_DETACH => Some(0),
        _ => None,
    }
}

enum DecodeState {
    /// Looking for a start byte.
    Hunt,
    /// Start seen, next is the kind.
    Kind,
    /// Collecting the payload and CRC.  `buf` has the kind and everything after it.
    Body { len: usize },
}

/// Frame decoder, fed one byte at a time.  Also keeps track of the latest report, to act as a
/// [`KeyReportSource`].
pub struct LinkDecoder {
    state: DecodeState,
    buf: ArrayVec<u8, MAX_FRAME>,
    latest: Option<KeyReport>,
    fresh: bool,
}

impl LinkDecoder {
    pub fn new() -> LinkDecoder {
        LinkDecoder {
            state: DecodeState::Hunt,
            buf: ArrayVec::new(),
            latest: None,
            fresh: false,
        }
    }

    /// Is there a keyboard on the other end.
    pub fn is_attached(&self) -> bool {
        self.latest.is_some()
    }

    /// Handle one incoming byte.  Returns the event when it completes a good frame.
    pub fn push(&mut self, byte: u8) -> Option<LinkEvent> {
        match self.state {
            DecodeState::Hunt => {
                if byte == SOF {
                    self.state = DecodeState::Kind;
                }
                None
            }
            DecodeState::Kind => {
                // A run of start bytes is still one frame start.
                if byte == SOF {
                    return None;
                }
                let Some(len) = payload_len(byte) else {
                    warn!("Link: unknown frame kind {:x}", byte);
                    self.state = DecodeState::Hunt;
                    return None;
                };
                self.buf.clear();
                self.buf.push(byte);
                self.state = DecodeState::Body { len };
                None
            }
            DecodeState::Body { len } => {
                self.buf.push(byte);
                // Kind, payload, and two bytes of CRC.
                if self.buf.len() < 1 + len + 2 {
                    return None;
                }
                self.state = DecodeState::Hunt;
                match self.finish(len) {
                    Some(event) => {
                        self.accept(event);
                        Some(event)
                    }
                    None => self.resync(),
                }
            }
        }
    }

    /// A frame cut short swallows the start of the next one.  Restart from the first start byte
    /// inside the bad frame, replaying what followed it.  Returns the last event the replay
    /// completes; all of them have been accepted.
    fn resync(&mut self) -> Option<LinkEvent> {
        let start = self.buf.iter().position(|&b| b == SOF)?;
        let tail: ArrayVec<u8, MAX_FRAME> = self.buf[start + 1..].iter().copied().collect();
        self.state = DecodeState::Kind;
        tail.into_iter().fold(None, |last, byte| self.push(byte).or(last))
    }

    /// Check and decode a complete frame in `buf`.
    fn finish(&self, len: usize) -> Option<LinkEvent> {
        let (body, crc) = self.buf.split_at(1 + len);
        let expected = CRC.checksum(body);
        let got = u16::from_le_bytes([crc[0], crc[1]]);
        if expected != got {
            warn!("Link: CRC mismatch, got {:x}, expected {:x}", got, expected);
            return None;
        }

        match body[0] {
            KIND_REPORT => {
                let mut data = [0u8; REPORT_SIZE];
                data.copy_from_slice(&body[1..]);
                Some(LinkEvent::Report(KeyReport::from_bytes(&data)))
            }
            _ => Some(LinkEvent::Detach),
        }
    }

    fn accept(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Report(report) => {
                if self.latest.is_none() {
                    info!("Keyboard attached");
                }
                debug!("Report: mods {:x}", report.modifiers.bits());
                self.latest = Some(report);
                self.fresh = true;
            }
            LinkEvent::Detach => {
                if self.latest.is_some() {
                    info!("Keyboard detached");
                }
                self.latest = None;
                self.fresh = false;
            }
        }
    }
}

impl Default for LinkDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyReportSource for LinkDecoder {
    fn poll(&mut self) -> Option<KeyReport> {
        if !self.fresh {
            return None;
        }
        self.fresh = false;
        self.latest
    }
}
