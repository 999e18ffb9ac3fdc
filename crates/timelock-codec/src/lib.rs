mod codec;
mod error;

pub use codec::decode_record;
pub use codec::element_to_bytes;
pub use codec::encode_record;
pub use codec::puzzle_from_record;
pub use codec::record_from_puzzle;
pub use error::CodecError;
