//! Top-level animated render pipeline: request in, MP4 on disk out.

use std::path::Path;

use anyhow::Context as _;
use tracing::{info, warn};

use crate::{
    compose::CardScene,
    config::RenderConfig,
    encode_ffmpeg::{self, EncodeConfig},
    error::CardResult,
    metrics::LoadedFont,
    model::{CardRequest, RenderedCard},
    raster::FrameRgba,
    script, shape,
    workspace::Workspace,
};

/// Renders a letter-by-letter animated title card and encodes it to
/// `card_<job>.mp4` under the configured output directory.
///
/// Fully synchronous: validation, font loading, per-frame compositing and
/// the encoder subprocess all run on the calling thread. Every failure
/// aborts the whole render; on success the returned path exists on disk.
pub fn render_title_card(req: &CardRequest, cfg: &RenderConfig) -> CardResult<RenderedCard> {
    req.validate()?;

    let font_path = cfg.font_for(req.font_file.as_deref());
    let font = LoadedFont::load(font_path, req.font_size as f32)?;

    let is_arabic = script::looks_arabic(&req.text);
    let dir = req.direction.resolve(is_arabic);
    let vis_text = shape::shape_visual(&req.text);

    let scene = CardScene::build(req, &vis_text, dir, &font)?;
    info!(
        chars = scene.chars.len(),
        frames = scene.timing.total_frames,
        duration_sec = scene.timing.duration_sec,
        rtl = dir.is_rtl(),
        "rendering title card"
    );

    let ws = Workspace::create(&cfg.out_dir)?;
    for f in 0..scene.timing.total_frames {
        let t = scene.timing.frame_time(f);
        let frame = scene.compose_frame(&font, t);
        save_frame_png(&frame, &ws.frame_path(f))?;
    }

    let file_name = format!("card_{}.mp4", ws.job_id());
    let out_path = cfg.out_dir.join(&file_name);
    let encode = EncodeConfig {
        fps: req.fps,
        frame_pattern: ws.frame_pattern(),
        out_path: out_path.clone(),
        overwrite: true,
    };

    if let Err(e) = encode_ffmpeg::encode_frames(&encode) {
        warn!(
            dir = %ws.frames_dir().display(),
            "encode failed, leaving frame workspace in place"
        );
        return Err(e);
    }
    ws.cleanup();

    info!(out = %out_path.display(), "title card written");
    Ok(RenderedCard {
        file_name,
        path: out_path,
        duration_sec: scene.timing.duration_sec,
        total_frames: scene.timing.total_frames,
    })
}

pub(crate) fn save_frame_png(frame: &FrameRgba, path: &Path) -> CardResult<()> {
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
