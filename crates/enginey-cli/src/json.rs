use enginey_project::ProjectConfig;
use enginey_yscript::{Literal, NodeGraph, NodeId, Property};
use serde_json::{Value, json};

fn literal(value: &Literal<'_>) -> Value {
    match *value {
        Literal::Boolean(b) => json!(b),
        Literal::Integer(i) => json!(i),
        Literal::Float(f) => json!(f),
        Literal::String(s) => json!(s),
    }
}

fn property(p: &Property<'_>) -> Value {
    json!({
        "kind": p.kind.name(),
        "values": p.values.iter().map(literal).collect::<Vec<_>>(),
    })
}

fn node(graph: &NodeGraph<'_>, id: NodeId) -> Value {
    let n = &graph[id];
    json!({
        "kind": n.kind.name(),
        "id": n.id,
        "properties": n.properties.iter().map(property).collect::<Vec<_>>(),
        "children": n.children.iter().map(|&c| node(graph, c)).collect::<Vec<_>>(),
    })
}

/// Node forest and raw metadata.
pub fn graph(graph: &NodeGraph<'_>) -> Value {
    let meta = graph.metadata();
    json!({
        "metadata": {
            "project_name": meta.project_name,
            "properties": meta.properties.iter().map(property).collect::<Vec<_>>(),
            "resources": meta.resource_properties.iter().map(property).collect::<Vec<_>>(),
            "scenes": meta.scene_list.iter().map(literal).collect::<Vec<_>>(),
        },
        "nodes": graph.root_ids().iter().map(|&id| node(graph, id)).collect::<Vec<_>>(),
    })
}

pub fn config(config: &ProjectConfig) -> Value {
    let project = &config.project;
    let window = &config.window;
    json!({
        "project": {
            "name": project.name,
            "author": project.author,
            "description": project.description,
            "version": project.version,
            "path": project.project_path.display().to_string(),
            "resources_dir": project.resources_dir.as_ref().map(|p| p.display().to_string()),
            "shader_dir": project.shader_dir.as_ref().map(|p| p.display().to_string()),
            "texture_dir": project.texture_dir.as_ref().map(|p| p.display().to_string()),
            "model_dir": project.model_dir.as_ref().map(|p| p.display().to_string()),
            "scenes": project.scenes,
        },
        "window": {
            "title": window.title,
            "size": window.size,
            "min_size": window.min_size,
            "clear_color": window.clear_color,
            "flags": window.flags,
            "color_bits": window.color_bits,
            "stencil_size": window.stencil_size,
            "multisample_buffers": window.multisample_buffers,
            "multisample_samples": window.multisample_samples,
            "fullscreen": window.fullscreen,
            "vsync": window.vsync,
            "rendering_to_screen": window.rendering_to_screen,
            "accelerated_visual": window.accelerated_visual,
        },
    })
}
