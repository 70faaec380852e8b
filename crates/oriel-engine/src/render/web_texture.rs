use crate::web::BitmapData;

use super::ctx::RenderCtx;

/// Texture format matching the web backend's BGRA8 bitmaps.
pub const WEB_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;

/// GPU copy of the web view's bitmap.
///
/// Lazily (re)allocated to the incoming bitmap's size, so view resizes need
/// no coordination: the next upload just allocates fresh textures.
pub struct WebTexture {
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    width: u32,
    height: u32,
}

impl Default for WebTexture {
    fn default() -> Self {
        Self {
            texture: None,
            view: None,
            width: 0,
            height: 0,
        }
    }
}

impl WebTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first upload.
    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.view.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Uploads `bitmap`, honoring its row stride.
    pub fn upload(&mut self, ctx: &RenderCtx<'_>, bitmap: &BitmapData<'_>) {
        if bitmap.width == 0 || bitmap.height == 0 {
            return;
        }

        if self.texture.is_none() || self.width != bitmap.width || self.height != bitmap.height {
            self.allocate(ctx, bitmap.width, bitmap.height);
        }

        let Some(texture) = self.texture.as_ref() else {
            return;
        };

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bitmap.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bitmap.row_bytes as u32),
                rows_per_image: Some(bitmap.height),
            },
            wgpu::Extent3d {
                width: bitmap.width,
                height: bitmap.height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn allocate(&mut self, ctx: &RenderCtx<'_>, width: u32, height: u32) {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("oriel web texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: WEB_TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.texture = Some(texture);
        self.width = width;
        self.height = height;
        log::debug!("web texture reallocated at {width}x{height}");
    }
}
