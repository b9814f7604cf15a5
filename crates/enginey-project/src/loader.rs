use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use enginey_yscript::{Error, NodeBuilder, NodeGraph, Program, parse_str};
use ouroboros::self_referencing;

use crate::config::{ConfigBuilder, ProjectConfig};

/// Options for [`Project::load`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Directory relative project paths resolve against. Defaults to the
    /// directory containing the project file.
    pub root: Option<PathBuf>,
    /// Build the node graph only; skip project config validation. Used for
    /// scene files, which carry no project metadata.
    pub skip_config: bool,
}

#[self_referencing]
struct Frontend {
    program: Program,

    #[borrows(program)]
    #[covariant]
    graph: NodeGraph<'this>,
}

/// A loaded project or scene file.
///
/// Owns the parsed program together with the node graph that borrows it.
pub struct Project {
    path: PathBuf,
    options: LoadOptions,
    source: String,
    frontend: Frontend,
    config: Option<ProjectConfig>,
}

impl Project {
    /// Lex, parse, build, and validate the file at `path`.
    ///
    /// Refuses a file with any parse error, reporting all of them, and stops
    /// at the first build or config error.
    pub fn load(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        log::info!("loading {}", path.display());

        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let program = parse_str(&source).with_context(|| format!("failed to parse {}", path.display()))?;

        let frontend = FrontendTryBuilder {
            program,
            graph_builder: |program| NodeBuilder::new().build(program),
        }
        .try_build()
        .map_err(Error::Build)
        .with_context(|| format!("failed to build nodes for {}", path.display()))?;

        let config = if options.skip_config {
            None
        } else {
            let root = match &options.root {
                Some(root) => root.clone(),
                None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
            };
            let config = ConfigBuilder::new(root)
                .build(frontend.borrow_graph().metadata())
                .with_context(|| format!("invalid project configuration in {}", path.display()))?;
            Some(config)
        };

        let project = Self { path, options, source, frontend, config };
        log::info!(
            "loaded {} ({} node(s))",
            project.path.display(),
            project.graph().len()
        );
        Ok(project)
    }

    /// Load the same file again with the same options.
    ///
    /// On failure the current state is kept and the error returned.
    pub fn reload(&mut self) -> Result<()> {
        *self = Self::load(&self.path, self.options.clone())?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn program(&self) -> &Program {
        self.frontend.borrow_program()
    }

    pub fn graph(&self) -> &NodeGraph<'_> {
        self.frontend.borrow_graph()
    }

    /// `None` when loaded with [`LoadOptions::skip_config`].
    pub fn config(&self) -> Option<&ProjectConfig> {
        self.config.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enginey_yscript::NodeType;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, src: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, src).unwrap();
        path
    }

    fn load_err(path: impl AsRef<Path>, options: LoadOptions) -> anyhow::Error {
        match Project::load(path, options) {
            Ok(project) => panic!("{} loaded without error", project.path().display()),
            Err(err) => err,
        }
    }

    const PROJECT: &str = r#"
        project Demo {
            author: "Jane";
            version: "0.3.1";
        }
        resources { shaders: "shaders"; }
        scenes { "main.ysc" }
    "#;

    #[test]
    fn loads_project_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "demo.yproj", PROJECT);

        let project = Project::load(&path, LoadOptions::default()).unwrap();
        assert_eq!(project.path(), path);
        assert_eq!(project.program().len(), 3);
        assert_eq!(project.graph().metadata().project_name, "Demo");

        let config = project.config().unwrap();
        assert_eq!(config.project.version, [0, 3, 1]);
        assert_eq!(config.project.shader_dir, Some(dir.path().join("shaders")));
        assert_eq!(config.project.scenes, ["main.ysc"]);
    }

    #[test]
    fn resources_property_and_block_together() {
        let dir = TempDir::new().unwrap();
        let src = r#"
            project Demo { resources: "res"; }
            resources { shaders: "shaders"; }
        "#;
        let path = write(&dir, "demo.yproj", src);

        let project = Project::load(&path, LoadOptions::default()).unwrap();
        let config = project.config().unwrap();
        assert_eq!(config.project.resources_dir, Some(dir.path().join("res")));
        assert_eq!(config.project.shader_dir, Some(dir.path().join("res").join("shaders")));
    }

    #[test]
    fn loads_scene_without_config() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "main.ysc", "node<Scene> main_scene { node<Entity> player; }");

        let options = LoadOptions { skip_config: true, ..Default::default() };
        let project = Project::load(&path, options).unwrap();
        assert!(project.config().is_none());
        let root = project.graph().roots().next().unwrap();
        assert_eq!(root.kind, NodeType::Scene);
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn refuses_aborted_parse_with_every_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.ysc", "node<Entity> _; node<Entity> ok; node<Camera> _;");

        let err = load_err(&path, LoadOptions::default());
        let Some(Error::Parse(errors)) = err.downcast_ref::<Error>() else {
            panic!("expected parse error, got {err:#}");
        };
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn refuses_build_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.ysc", r#"node<Entity> e { flags: { true, "x" }; }"#);

        let err = load_err(&path, LoadOptions::default());
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Build(_))));
        assert!(format!("{err:#}").contains("incompatible"));
    }

    #[test]
    fn refuses_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.yproj", r#"project p { version: "one"; }"#);

        let err = load_err(&path, LoadOptions::default());
        assert!(format!("{err:#}").contains("invalid project property 'version'"));
    }

    #[test]
    fn missing_file() {
        let err = load_err("/definitely/not/here.yproj", LoadOptions::default());
        assert!(format!("{err}").contains("failed to read"));
    }

    #[test]
    fn reload_rereads_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "demo.yproj", PROJECT);
        let mut project = Project::load(&path, LoadOptions::default()).unwrap();

        fs::write(&path, r#"project Renamed { author: "Sam"; }"#).unwrap();
        project.reload().unwrap();
        assert_eq!(project.graph().metadata().project_name, "Renamed");
        assert_eq!(project.config().unwrap().project.author, "Sam");

        fs::write(&path, "project ;").unwrap();
        assert!(project.reload().is_err());
        assert_eq!(project.graph().metadata().project_name, "Renamed");
    }

    #[test]
    fn explicit_root() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "demo.yproj", PROJECT);
        let options = LoadOptions { root: Some(PathBuf::from("/opt/demo")), ..Default::default() };

        let project = Project::load(&path, options).unwrap();
        let config = project.config().unwrap();
        assert_eq!(config.project.shader_dir, Some(PathBuf::from("/opt/demo/shaders")));
    }
}
