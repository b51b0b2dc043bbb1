use image::DynamicImage;
use std::path::Path;

use crate::gpu::{FilterMode, GlApi, TextureHandle, TextureParameter, WrapMode};
use crate::utils::error::TextureError;

/// Bytes per pixel after decoding; every image is expanded to RGBA8.
pub const RGBA_CHANNELS: u8 = 4;

/// Pixel data ready for upload.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    source_channels: u8,
    pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path.as_ref())?;
        Ok(Self::from_image(img))
    }

    pub fn from_image(img: DynamicImage) -> Self {
        let source_channels = img.color().channel_count();
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            source_channels,
            pixels: rgba.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel count of the file before it was forced to RGBA.
    pub fn source_channels(&self) -> u8 {
        self.source_channels
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Texture {
    handle: TextureHandle,
    width: u32,
    height: u32,
    channels: u8,
}

impl Texture {
    /// Creates a repeating, linearly filtered texture with a full mip chain.
    pub fn upload(gl: &mut impl GlApi, image: &DecodedImage) -> Result<Self, TextureError> {
        let (width, height) = (image.width(), image.height());
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(TextureError::TooLarge { width, height });
        }

        let handle = gl.create_texture();
        gl.bind_texture(handle);

        gl.tex_parameter(TextureParameter::WrapS(WrapMode::Repeat));
        gl.tex_parameter(TextureParameter::WrapT(WrapMode::Repeat));
        gl.tex_parameter(TextureParameter::MinFilter(FilterMode::Linear));
        gl.tex_parameter(TextureParameter::MagFilter(FilterMode::Linear));

        gl.tex_image_2d_rgba8(width, height, image.pixels());
        gl.generate_mipmap();

        Ok(Self {
            handle,
            width,
            height,
            channels: RGBA_CHANNELS,
        })
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn release(self, gl: &mut impl GlApi) {
        gl.delete_texture(self.handle);
    }
}
