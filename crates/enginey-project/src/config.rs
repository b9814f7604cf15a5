use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail, ensure};
use enginey_yscript::{Literal, Property, PropertyType, RawProjectMetadata};

// ── Window ────────────────────────────────────────────────────────────────

/// Window and GL surface settings.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub min_size: [u32; 2],
    pub size: [u32; 2],
    pub clear_color: [f32; 4],
    pub flags: u32,
    pub color_bits: [u32; 4],
    pub stencil_size: u32,
    pub multisample_buffers: u32,
    pub multisample_samples: u32,
    pub fullscreen: bool,
    pub vsync: bool,
    pub rendering_to_screen: bool,
    pub accelerated_visual: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Engine Y".to_string(),
            min_size: [200, 200],
            size: [800, 600],
            clear_color: [0.2, 0.3, 0.3, 1.0],
            flags: 0,
            color_bits: [8, 8, 8, 8],
            stencil_size: 8,
            multisample_buffers: 1,
            multisample_samples: 16,
            fullscreen: false,
            vsync: false,
            rendering_to_screen: true,
            accelerated_visual: true,
        }
    }
}

// ── Project ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectMetadata {
    pub name: String,
    pub author: String,
    pub description: String,
    pub version: [u32; 3],
    /// Project directory. Resource directories are resolved under it.
    pub project_path: PathBuf,
    /// Set by the `resources` project property; replaces `project_path` as
    /// the base of the resource directories.
    pub resources_dir: Option<PathBuf>,
    pub shader_dir: Option<PathBuf>,
    pub texture_dir: Option<PathBuf>,
    pub model_dir: Option<PathBuf>,
    pub scenes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    pub project: ProjectMetadata,
    pub window: WindowConfig,
}

// ── ConfigBuilder ─────────────────────────────────────────────────────────

/// Validates raw metadata into a [`ProjectConfig`].
///
/// `root` is the directory relative paths are resolved against, normally the
/// directory containing the project file.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    root: PathBuf,
}

impl ConfigBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn build(&self, raw: &RawProjectMetadata<'_>) -> Result<ProjectConfig> {
        let mut project = ProjectMetadata {
            name: raw.project_name.to_string(),
            project_path: self.root.clone(),
            ..ProjectMetadata::default()
        };
        for p in &raw.properties {
            apply_project_property(&mut project, p, &self.root)
                .with_context(|| format!("invalid project property '{}'", p.kind))?;
        }
        if let Some(dir) = project.resources_dir.as_mut() {
            *dir = project.project_path.join(&*dir);
        }

        let mut window = WindowConfig::default();
        if !raw.window_title.is_empty() {
            window.title = raw.window_title.to_string();
        }
        for p in &raw.window_properties {
            apply_window_property(&mut window, p)
                .with_context(|| format!("invalid window property '{}'", p.kind))?;
        }

        for p in &raw.resource_properties {
            apply_resource_property(&mut project, p)
                .with_context(|| format!("invalid resource property '{}'", p.kind))?;
        }

        for (i, scene) in raw.scene_list.iter().enumerate() {
            let scene = scene
                .as_str()
                .ok_or_else(|| anyhow!("scene {} must be a string, found {scene}", i + 1))?;
            project.scenes.push(scene.to_string());
        }

        log::debug!(
            "project '{}' v{}.{}.{} with {} scene(s)",
            project.name,
            project.version[0],
            project.version[1],
            project.version[2],
            project.scenes.len()
        );
        Ok(ProjectConfig { project, window })
    }
}

fn apply_project_property(project: &mut ProjectMetadata, p: &Property<'_>, root: &Path) -> Result<()> {
    match p.kind {
        PropertyType::Name => project.name = single_string(p)?.to_string(),
        PropertyType::Author => project.author = single_string(p)?.to_string(),
        PropertyType::Description => project.description = single_string(p)?.to_string(),
        PropertyType::Version => project.version = parse_version(single_string(p)?)?,
        PropertyType::Path => project.project_path = root.join(single_string(p)?),
        PropertyType::Resources => project.resources_dir = Some(PathBuf::from(single_string(p)?)),
        other => bail!("'{other}' is not a project property"),
    }
    Ok(())
}

fn apply_window_property(window: &mut WindowConfig, p: &Property<'_>) -> Result<()> {
    match p.kind {
        PropertyType::Title => window.title = single_string(p)?.to_string(),
        PropertyType::Scale => window.size = integers(p)?,
        PropertyType::MinScale => window.min_size = integers(p)?,
        PropertyType::ClearColor => window.clear_color = floats(p)?,
        PropertyType::Flags => {
            for v in &p.values {
                window.flags |= to_integer(v)?;
            }
        }
        PropertyType::ColorBits => window.color_bits = integers(p)?,
        PropertyType::StencilSize => window.stencil_size = single_integer(p)?,
        PropertyType::MultisampleBuffers => {
            let buffers = single_integer(p)?;
            ensure!(buffers <= 1, "must be either 0 or 1, found {buffers}");
            window.multisample_buffers = buffers;
        }
        PropertyType::MultisampleSamples => {
            let samples = single_integer(p)?;
            ensure!(samples <= 16, "must be between 0 and 16, found {samples}");
            window.multisample_samples = samples;
        }
        PropertyType::Fullscreen => window.fullscreen = single_bool(p)?,
        PropertyType::Vsync => window.vsync = single_bool(p)?,
        PropertyType::RenderingToScreen => window.rendering_to_screen = single_bool(p)?,
        PropertyType::AcceleratedVisual => window.accelerated_visual = single_bool(p)?,
        other => bail!("'{other}' is not a window property"),
    }
    Ok(())
}

fn apply_resource_property(project: &mut ProjectMetadata, p: &Property<'_>) -> Result<()> {
    let base = project.resources_dir.as_ref().unwrap_or(&project.project_path);
    let dir = base.join(single_string(p)?);
    match p.kind {
        PropertyType::Shaders => project.shader_dir = Some(dir),
        PropertyType::Textures => project.texture_dir = Some(dir),
        PropertyType::Models => project.model_dir = Some(dir),
        other => bail!("'{other}' is not a resource property"),
    }
    Ok(())
}

// ── Value helpers ─────────────────────────────────────────────────────────

fn single<'a>(p: &Property<'a>) -> Result<Literal<'a>> {
    p.single()
        .ok_or_else(|| anyhow!("expected a single value, found {}", p.values.len()))
}

fn single_string<'a>(p: &Property<'a>) -> Result<&'a str> {
    match single(p)? {
        Literal::String(s) => Ok(s),
        other => bail!("expected a string, found {other}"),
    }
}

fn single_bool(p: &Property<'_>) -> Result<bool> {
    let value = single(p)?;
    value.as_bool().ok_or_else(|| anyhow!("expected a boolean, found {value}"))
}

fn single_integer(p: &Property<'_>) -> Result<u32> {
    to_integer(&single(p)?)
}

/// Numbers arrive as floats; only non-negative whole values are accepted.
fn to_integer(value: &Literal<'_>) -> Result<u32> {
    match *value {
        Literal::Integer(i) => u32::try_from(i).with_context(|| format!("{i} is out of range")),
        Literal::Float(f) if f.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&f) => Ok(f as u32),
        other => bail!("expected a non-negative integer, found {other}"),
    }
}

fn integers<const N: usize>(p: &Property<'_>) -> Result<[u32; N]> {
    ensure!(p.values.len() == N, "expected {N} integers, found {} value(s)", p.values.len());
    let mut out = [0; N];
    for (slot, value) in out.iter_mut().zip(&p.values) {
        *slot = to_integer(value)?;
    }
    Ok(out)
}

fn floats<const N: usize>(p: &Property<'_>) -> Result<[f32; N]> {
    ensure!(p.values.len() == N, "expected {N} numbers, found {} value(s)", p.values.len());
    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(&p.values) {
        *slot = value.as_f64().ok_or_else(|| anyhow!("expected a number, found {value}"))? as f32;
    }
    Ok(out)
}

/// `major[.minor[.patch]]`; missing parts are zero.
fn parse_version(text: &str) -> Result<[u32; 3]> {
    let parts: Vec<&str> = text.split('.').collect();
    ensure!(
        !text.is_empty() && parts.len() <= 3,
        "version '{text}' must be in the format major.minor.patch"
    );
    let mut version = [0; 3];
    for (slot, part) in version.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .with_context(|| format!("version '{text}' has a non-numeric part '{part}'"))?;
    }
    Ok(version)
}
