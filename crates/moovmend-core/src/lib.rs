//! Moovmend-Core: byte-level repair of interrupted MP4/MOV captures
//!
//! A capture whose recording was cut short usually still holds its media
//! samples and a trailing (possibly truncated) `moov` box, but the leading
//! `mdat` header is damaged. This crate rebuilds a playable byte stream
//! without parsing the box tree:
//!
//! 1. Scan for the last `moov` tag ([`atom::find_last`])
//! 2. Convert it into an anchor offset ([`locator::locate_moov`])
//! 3. Synthesize a 16-byte extended-size `mdat` header whose size field is
//!    derived from the anchor ([`MdatHeader`])
//! 4. Splice the header over the original leading bytes and trim the
//!    device footer ([`reconstruct`])
//!
//! The magic numbers of step 4 come from a [`DeviceProfile`].
//!
//! # Example
//!
//! ```
//! use moovmend_core::{locate_moov, reconstruct, DeviceProfile};
//!
//! let mut capture = vec![0xAAu8; 20];
//! capture.extend_from_slice(b"moov");
//! capture.extend(std::iter::repeat(0x55).take(600));
//!
//! let anchor = locate_moov(&capture)?;
//! let repaired = reconstruct(&capture, anchor, &DeviceProfile::default())?;
//! assert_eq!(repaired.len(), capture.len() - 334);
//! assert_eq!(&repaired[4..8], b"mdat");
//! # Ok::<(), moovmend_core::Error>(())
//! ```

pub mod atom;
pub mod capture;
pub mod error;
pub mod locator;
pub mod profile;
pub mod reconstruct;

pub use atom::{find_last, AtomType};
pub use capture::{CorruptedCapture, ReferenceCapture};
pub use error::{Error, FailureKind, Result};
pub use locator::{locate_moov, AnchorOffset};
pub use profile::DeviceProfile;
pub use reconstruct::{inspect, reconstruct, MdatHeader, RepairPlan};
