pub mod category;
pub mod encoding;
pub mod normalize;

pub use encoding::{
    Candidate, Codec, Detection, EncodingDetector, HangulScorer, Leniency, Scorer, hangul_ratio, printable_ratio,
    smart_decode,
};
pub use normalize::{Normalizer, normalize_text};
