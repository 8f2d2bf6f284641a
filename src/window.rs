use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    None,
    Quit,
}

/// An SDL2 window presenting an 8-bit indexed frame through a palette.
///
/// The core renders palette indices; `present` expands them through a
/// 256-entry ARGB palette into a staging buffer and uploads that to a
/// streaming texture. SDL2 is used only for the window and the final blit.
pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    texture: sdl2::render::Texture<'static>,
    event_pump: sdl2::EventPump,
    staging: Vec<u32>,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // We ensure texture is dropped before texture_creator by struct field order.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;

        Ok(Self {
            canvas,
            texture_creator,
            texture,
            event_pump,
            staging: vec![0u32; (width * height) as usize],
            width,
            height,
        })
    }

    pub fn poll_events(&mut self) -> WindowEvent {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return WindowEvent::Quit,
                _ => {}
            }
        }
        WindowEvent::None
    }

    /// Expand the indexed frame through `palette` and present it.
    ///
    /// `pitch` is the row stride of `indices` in bytes; only the leftmost
    /// `width` bytes of each row are shown.
    pub fn present(
        &mut self,
        indices: &[u8],
        pitch: usize,
        palette: &[u32; 256],
    ) -> Result<(), String> {
        let width = self.width as usize;
        for y in 0..self.height as usize {
            let src = &indices[y * pitch..y * pitch + width];
            let dst = &mut self.staging[y * width..(y + 1) * width];
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = palette[s as usize];
            }
        }

        let bytes = unsafe {
            std::slice::from_raw_parts(
                self.staging.as_ptr() as *const u8,
                self.staging.len() * 4,
            )
        };
        self.texture
            .update(None, bytes, width * 4)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))?;
        self.canvas.present();
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_title(&mut self, title: &str) {
        let _ = self.canvas.window_mut().set_title(title);
    }
}
