use thiserror::Error;

/// All errors letter generation can produce. Malformed markup is never an
/// error (the parser degrades to plain text); only asset embedding and I/O
/// can fail.
#[derive(Error, Debug)]
pub enum LetterError {
    /// The landing URL could not be encoded as a QR matrix.
    #[error("QR encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// The QR bitmap could not be embedded into the PDF.
    #[error("image embedding failed: {0}")]
    ImageEmbed(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
