mod public_point;
mod signature_codec;

pub use public_point::{extract_public_point, ID_EC_PUBLIC_KEY, SECP256R1};
pub use signature_codec::{der_to_p1363, CURVE_ORDER};
