use std::fmt;

// ── TokenKind ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    StartOfFile,

    // Declaration keywords
    Project,
    Window,
    Resources,
    Scenes,
    Node,
    Fn,
    Main,

    // Project properties
    Name,
    Author,
    Version,
    Description,
    Path,
    // Window properties
    Title,
    MinScale,
    ClearColor,
    Flags,
    ColorBits,
    StencilSize,
    MultisampleBuffers,
    MultisampleSamples,
    Fullscreen,
    Vsync,
    RenderingToScreen,
    AcceleratedVisual,
    // Resource properties
    Shaders,
    Textures,
    Models,
    // Transform properties
    Position,
    Rotation,
    Scale,
    // Renderable properties
    Mesh,
    Texture,
    Shader,
    Model,
    // Light properties
    Color,
    Ambient,
    Diffuse,
    Specular,
    Constant,
    Linear,
    Quadratic,
    // Camera properties
    Front,
    Up,
    Right,
    WorldUp,
    EulerAngles,
    Viewport,
    Clip,
    Speed,
    Sensitivity,
    Fov,
    Zoom,
    // Script / physics / collider properties
    Object,
    BodyType,
    Radius,
    Height,

    // Node types
    Scene,
    Entity,
    Transform,
    Renderable,
    TexturedRenderable,
    RenderableModel,
    PointLight,
    Camera,
    Script,
    NativeScript,
    PhysicsBody,
    BoxCollider,
    SphereCollider,
    CapsuleCollider,
    ModelCollider,

    // Value types
    BoolType,
    FloatType,
    StringType,

    True,
    False,

    Identifier,

    // Punctuation and operators
    LessThan,
    GreaterThan,
    LessThanEquals,
    GreaterThanEquals,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Comma,
    Colon,
    ColonColon,
    Period,
    BackSlash,
    Equals,
    EqualsEquals,
    BangEquals,
    Minus,
    Plus,
    Star,
    Slash,
    Percent,
    MinusMinus,
    PlusPlus,
    MinusEquals,
    PlusEquals,
    StarEquals,
    SlashEquals,
    PercentEquals,
    Bang,
    Question,
    AndAnd,
    OrOr,
    Semicolon,
    Hash,
    Dollar,
    /// `$<>`, and the placeholder name given to anonymous declarations.
    EmptyValue,
    Underscore,

    // Literals
    String,
    Character,
    Float,

    EndOfFile,
}

impl TokenKind {
    /// Keyword lookup for an identifier-shaped word.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match word {
            "project" => Project,
            "window" => Window,
            "resources" => Resources,
            "scenes" => Scenes,
            "node" => Node,
            "fn" => Fn,
            "main" => Main,

            "name" => Name,
            "author" => Author,
            "version" => Version,
            "description" => Description,
            "path" => Path,
            "title" => Title,
            "min_scale" => MinScale,
            "clear_color" => ClearColor,
            "flags" => Flags,
            "color_bits" => ColorBits,
            "stencil_size" => StencilSize,
            "multisample_buffers" => MultisampleBuffers,
            "multisample_samples" => MultisampleSamples,
            "fullscreen" => Fullscreen,
            "vsync" => Vsync,
            "rendering_to_screen" => RenderingToScreen,
            "accelerated_visual" => AcceleratedVisual,
            "shaders" => Shaders,
            "textures" => Textures,
            "models" => Models,
            "position" => Position,
            "rotation" => Rotation,
            "scale" => Scale,
            "mesh" => Mesh,
            "texture" => Texture,
            "shader" => Shader,
            "model" => Model,
            "color" => Color,
            "ambient" => Ambient,
            "diffuse" => Diffuse,
            "specular" => Specular,
            "constant" => Constant,
            "linear" => Linear,
            "quadratic" => Quadratic,
            "front" => Front,
            "up" => Up,
            "right" => Right,
            "world_up" => WorldUp,
            "euler_angles" => EulerAngles,
            "viewport" => Viewport,
            "clip" => Clip,
            "speed" => Speed,
            "sensitivity" => Sensitivity,
            "fov" => Fov,
            "zoom" => Zoom,
            "object" => Object,
            "body_type" => BodyType,
            "radius" => Radius,
            "height" => Height,

            "scene" | "Scene" => Scene,
            "entity" | "Entity" => Entity,
            "transform" | "Transform" => Transform,
            "renderable" | "Renderable" => Renderable,
            "textured_renderable" | "TexturedRenderable" => TexturedRenderable,
            "renderable_model" | "RenderableModel" => RenderableModel,
            "point_light" | "PointLight" => PointLight,
            "camera" | "Camera" => Camera,
            "script" | "Script" => Script,
            "native_script" | "NativeScript" => NativeScript,
            "physics_body" | "PhysicsBody" => PhysicsBody,
            "box_collider" | "BoxCollider" => BoxCollider,
            "sphere_collider" | "SphereCollider" => SphereCollider,
            "capsule_collider" | "CapsuleCollider" => CapsuleCollider,
            "model_collider" | "ModelCollider" => ModelCollider,
            // `node<Project>` parses, the builder rejects it
            "Project" => Project,

            "bool" => BoolType,
            "float" => FloatType,
            "string" => StringType,

            "true" => True,
            "false" => False,
            _ => return None,
        })
    }

    /// Keywords that may introduce a `key: value` property.
    pub fn is_property(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Name | Author | Version | Description | Resources | Path
                | Title | MinScale | ClearColor | Flags | ColorBits | StencilSize
                | MultisampleBuffers | MultisampleSamples | Fullscreen | Vsync
                | RenderingToScreen | AcceleratedVisual
                | Shaders | Textures | Models
                | Position | Rotation | Scale
                | Mesh | Texture | Shader | Model
                | Color | Ambient | Diffuse | Specular | Constant | Linear | Quadratic
                | Front | Up | Right | WorldUp | EulerAngles | Viewport | Clip
                | Speed | Sensitivity | Fov | Zoom
                | Object | BodyType | Radius | Height
        )
    }

    /// Keywords accepted between the angle brackets of `node<...>`.
    pub fn is_node_type(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Project | Scene | Entity | Transform
                | Renderable | TexturedRenderable | RenderableModel
                | PointLight | Camera | Script | NativeScript | PhysicsBody
                | BoxCollider | SphereCollider | CapsuleCollider | ModelCollider
        )
    }

    /// Node types that may be declared with `_` instead of an identifier.
    pub fn permits_anonymous(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Transform | Renderable | TexturedRenderable | PointLight | RenderableModel
                | Script | PhysicsBody | BoxCollider | SphereCollider | CapsuleCollider
        )
    }

    pub fn is_value_type(self) -> bool {
        matches!(self, TokenKind::BoolType | TokenKind::FloatType | TokenKind::StringType)
    }

    /// The plain operator behind a compound assignment (`+=` → `+`).
    pub fn compound_operator(self) -> Option<TokenKind> {
        use TokenKind::*;
        match self {
            PlusEquals => Some(Plus),
            MinusEquals => Some(Minus),
            StarEquals => Some(Star),
            SlashEquals => Some(Slash),
            PercentEquals => Some(Percent),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── Token ─────────────────────────────────────────────────────────────────

/// A lexeme with its 1-based source position.
///
/// String and character tokens carry their contents without the quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub col: u32,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, line: u32, col: u32, text: impl Into<String>) -> Self {
        Self { kind, line, col, text: text.into() }
    }

    /// Placeholder name for `_` declarations, positioned at the `_`.
    pub(crate) fn anonymous(at: &Token) -> Self {
        Self::new(TokenKind::EmptyValue, at.line, at.col, "")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} [{} , {}]", self.kind, self.text, self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_type_aliases_share_a_kind() {
        assert_eq!(TokenKind::keyword("point_light"), Some(TokenKind::PointLight));
        assert_eq!(TokenKind::keyword("PointLight"), Some(TokenKind::PointLight));
        assert_eq!(TokenKind::keyword("pointlight"), None);
    }

    #[test]
    fn anonymous_allow_list() {
        assert!(TokenKind::Transform.permits_anonymous());
        assert!(TokenKind::CapsuleCollider.permits_anonymous());
        assert!(!TokenKind::Entity.permits_anonymous());
        assert!(!TokenKind::Camera.permits_anonymous());
        assert!(!TokenKind::Scene.permits_anonymous());
    }

    #[test]
    fn resources_is_both_declaration_and_property() {
        assert!(TokenKind::Resources.is_property());
        assert!(!TokenKind::Resources.is_node_type());
    }

    #[test]
    fn compound_operators() {
        assert_eq!(TokenKind::PercentEquals.compound_operator(), Some(TokenKind::Percent));
        assert_eq!(TokenKind::Equals.compound_operator(), None);
    }
}
