mod algorithm;
mod handle;
mod key_id;
mod key_material;
mod policy;

pub use algorithm::{
    Digest, SignatureAlgorithm, CURVE_NAME, FIELD_BYTE_LENGTH, PUBLIC_POINT_LENGTH,
    SIGNATURE_LENGTH,
};
pub use handle::{DeleteOutcome, KeyPairHandle, PrivateKeyRef, StoreEntry};
pub use key_id::{KeyId, KeyIdError};
pub use key_material::{FixedSignature, KeyMaterialError, PublicKeyPoint, UNCOMPRESSED_POINT_TAG};
pub use policy::{AuthenticationPolicy, Authenticator, KeyPolicy, KeyPurpose};
