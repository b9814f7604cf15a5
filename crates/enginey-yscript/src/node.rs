use std::fmt;
use std::ops::Index;

use crate::token::TokenKind;

// ── Literal ───────────────────────────────────────────────────────────────

/// A property value. String values borrow the source AST's token text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Boolean(bool),
    /// Not produced by the builder: every numeric token is a `Float`.
    Integer(i64),
    Float(f64),
    String(&'a str),
}

/// Compatibility classes for the values of one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    Boolean,
    Numeric,
    String,
}

impl Literal<'_> {
    pub fn value_class(&self) -> ValueClass {
        match self {
            Literal::Boolean(_) => ValueClass::Boolean,
            Literal::Integer(_) | Literal::Float(_) => ValueClass::Numeric,
            Literal::String(_) => ValueClass::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Literal::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Literal::Integer(i) => Some(i as f64),
            Literal::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Float(v) => write!(f, "{v:?}"),
            Literal::String(s) => write!(f, "{s:?}"),
        }
    }
}

// ── PropertyType / NodeType ───────────────────────────────────────────────

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub fn from_token(kind: TokenKind) -> Option<Self> {
                match kind {
                    $(TokenKind::$variant => Some($name::$variant),)*
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text),*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

keyword_enum! {
    /// The key of a `key: value` property.
    PropertyType {
        Name => "name",
        Author => "author",
        Version => "version",
        Description => "description",
        Resources => "resources",
        Path => "path",
        Title => "title",
        MinScale => "min_scale",
        ClearColor => "clear_color",
        Flags => "flags",
        ColorBits => "color_bits",
        StencilSize => "stencil_size",
        MultisampleBuffers => "multisample_buffers",
        MultisampleSamples => "multisample_samples",
        Fullscreen => "fullscreen",
        Vsync => "vsync",
        RenderingToScreen => "rendering_to_screen",
        AcceleratedVisual => "accelerated_visual",
        Shaders => "shaders",
        Textures => "textures",
        Models => "models",
        Position => "position",
        Rotation => "rotation",
        Scale => "scale",
        Mesh => "mesh",
        Texture => "texture",
        Shader => "shader",
        Model => "model",
        Color => "color",
        Ambient => "ambient",
        Diffuse => "diffuse",
        Specular => "specular",
        Constant => "constant",
        Linear => "linear",
        Quadratic => "quadratic",
        Front => "front",
        Up => "up",
        Right => "right",
        WorldUp => "world_up",
        EulerAngles => "euler_angles",
        Viewport => "viewport",
        Clip => "clip",
        Speed => "speed",
        Sensitivity => "sensitivity",
        Fov => "fov",
        Zoom => "zoom",
        Object => "object",
        BodyType => "body_type",
        Radius => "radius",
        Height => "height",
    }
}

keyword_enum! {
    NodeType {
        Scene => "Scene",
        Entity => "Entity",
        Transform => "Transform",
        Renderable => "Renderable",
        TexturedRenderable => "TexturedRenderable",
        RenderableModel => "RenderableModel",
        PointLight => "PointLight",
        Camera => "Camera",
        Script => "Script",
        NativeScript => "NativeScript",
        PhysicsBody => "PhysicsBody",
        BoxCollider => "BoxCollider",
        SphereCollider => "SphereCollider",
        CapsuleCollider => "CapsuleCollider",
        ModelCollider => "ModelCollider",
    }
}

// ── Property ──────────────────────────────────────────────────────────────

/// A typed, ordered value list. All values share one [`ValueClass`].
#[derive(Debug, Clone, PartialEq)]
pub struct Property<'a> {
    pub kind: PropertyType,
    pub values: Vec<Literal<'a>>,
}

impl<'a> Property<'a> {
    /// The value when the list holds exactly one.
    pub fn single(&self) -> Option<Literal<'a>> {
        match self.values.as_slice() {
            [value] => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Property<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.kind)?;
        for (i, value) in self.values.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{value}")?;
        }
        Ok(())
    }
}

// ── Node ──────────────────────────────────────────────────────────────────

/// Index of a node in its [`NodeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node<'a> {
    pub parent: Option<NodeId>,
    pub kind: NodeType,
    /// Empty for anonymous (`_`) nodes.
    pub id: &'a str,
    pub children: Vec<NodeId>,
    pub properties: Vec<Property<'a>>,
}

impl<'a> Node<'a> {
    pub fn is_anonymous(&self) -> bool {
        self.id.is_empty()
    }

    pub fn property(&self, kind: PropertyType) -> Option<&Property<'a>> {
        self.properties.iter().find(|p| p.kind == kind)
    }
}

// ── RawProjectMetadata ────────────────────────────────────────────────────

/// Project-level declarations, unvalidated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawProjectMetadata<'a> {
    pub project_name: &'a str,
    pub properties: Vec<Property<'a>>,
    pub window_title: &'a str,
    pub window_properties: Vec<Property<'a>>,
    pub resource_properties: Vec<Property<'a>>,
    pub scene_list: Vec<Literal<'a>>,
}

// ── NodeGraph ─────────────────────────────────────────────────────────────

/// The built node forest plus project metadata.
///
/// Nodes live in an arena; parent and child links are [`NodeId`]s into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeGraph<'a> {
    pub(crate) nodes: Vec<Node<'a>>,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) metadata: RawProjectMetadata<'a>,
}

impl<'a> NodeGraph<'a> {
    pub(crate) fn alloc(&mut self, kind: NodeType, id: &'a str) -> NodeId {
        let node_id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent: None, kind, id, children: Vec::new(), properties: Vec::new() });
        node_id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<'a> {
        &mut self.nodes[id.0]
    }

    pub(crate) fn metadata_mut(&mut self) -> &mut RawProjectMetadata<'a> {
        &mut self.metadata
    }

    /// Top-level nodes in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &Node<'a>> {
        self.roots.iter().map(|&id| &self.nodes[id.0])
    }

    pub fn root_ids(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<'a>> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node<'a>> {
        self.nodes
            .get(id.0)
            .into_iter()
            .flat_map(|node| node.children.iter().map(|&child| &self.nodes[child.0]))
    }

    pub fn parent(&self, id: NodeId) -> Option<&Node<'a>> {
        self.get(id)?.parent.and_then(|p| self.get(p))
    }

    /// First node, in declaration order, with the given id.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.nodes.iter().position(|n| n.id == id).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn metadata(&self) -> &RawProjectMetadata<'a> {
        &self.metadata
    }

    /// Indented text rendering of the forest.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for &root in &self.roots {
            self.dump_node(root, 0, &mut out);
        }
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self.nodes[id.0];
        let indent = "  ".repeat(depth);
        let name = if node.is_anonymous() { "_" } else { node.id };
        out.push_str(&format!("{indent}{} {name}\n", node.kind));
        for property in &node.properties {
            out.push_str(&format!("{indent}  {property}\n"));
        }
        for &child in &node.children {
            self.dump_node(child, depth + 1, out);
        }
    }
}

impl<'a> Index<NodeId> for NodeGraph<'a> {
    type Output = Node<'a>;

    fn index(&self, id: NodeId) -> &Node<'a> {
        &self.nodes[id.0]
    }
}
