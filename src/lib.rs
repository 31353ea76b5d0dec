pub mod act;
pub mod gat;
pub mod graphics;
pub mod grf;
mod reader;
pub mod sprite;

use std::{fs::File, io::BufReader, path::Path};

/// Opens a GRF archive from a file on disk.
pub fn open_grf(path: impl AsRef<Path>) -> Result<grf::Archive<BufReader<File>>, grf::ArchiveError> {
    let file = File::open(path)?;
    grf::Archive::from_reader(BufReader::new(file))
}

/// Opens and decodes a GAT altitude map from a file on disk.
pub fn open_gat(path: impl AsRef<Path>) -> Result<gat::Gat, gat::DecodeError> {
    let file = File::open(path)?;
    gat::Decoder::new(BufReader::new(file)).decode()
}

/// Opens and decodes a SPR sprite collection from a file on disk.
pub fn open_spr(path: impl AsRef<Path>) -> Result<sprite::Spr, sprite::DecodeError> {
    let file = File::open(path)?;
    sprite::Decoder::new(BufReader::new(file)).decode()
}

/// Opens and decodes an ACT animation set from a file on disk.
pub fn open_act(path: impl AsRef<Path>) -> Result<act::Act, act::DecodeError> {
    let file = File::open(path)?;
    act::Decoder::new(BufReader::new(file)).decode()
}

pub mod prelude {
    #[doc(hidden)]
    pub use crate::act::{Act, Animation, Frame, Layer};
    #[doc(hidden)]
    pub use crate::gat::{Gat, Tile};
    #[doc(hidden)]
    pub use crate::graphics::{Color, Image};
    #[doc(hidden)]
    pub use crate::grf::{Archive, Asset, FileHeader, Payload};
    #[doc(hidden)]
    pub use crate::sprite::Spr;
    #[doc(hidden)]
    pub use crate::{open_act, open_gat, open_grf, open_spr};
}
