//! # Structure Dump — Printing the Scene Hierarchy
//!
//! Writes a scene, or the subtree under one node, as indented text lines:
//!
//! ```text
//! Scene: level
//! 	player
//! 	Transform: Transform { translation: Vec3(0.0, 0.0, 0.0), .. }
//! 		weapon
//! 		Damage: Damage(12)
//! ```
//!
//! Each node prints its name and then one line per component (short type
//! name and `Debug` form, in attach order), then its children one indent
//! unit deeper. The indent is a prefix string that grows by one unit per
//! level; it is not a depth counter. Scene roots start one unit in, below
//! the header.
//!
//! Lines go to a [`LogSink`]. [`LogTarget`] forwards them to the `log` facade
//! at `info` level under the `scenekit::structure` target; a `Vec<String>`
//! collects them.

use crate::ecs::{Entity, Scene, World};

/// Receiver of dump lines.
pub trait LogSink {
    fn append_line(&mut self, line: &str);
}

/// Forwards every line to `log::info!` on the `scenekit::structure` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTarget;

impl LogSink for LogTarget {
    fn append_line(&mut self, line: &str) {
        log::info!(target: "scenekit::structure", "{}", line);
    }
}

impl LogSink for Vec<String> {
    fn append_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    fn append_line(&mut self, line: &str) {
        (**self).append_line(line);
    }
}

/// Default indent unit.
pub const DEFAULT_INDENT: &str = "\t";

/// Formatting options for structure dumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOptions {
    /// Prefix added once per nesting level.
    pub indent: String,
    /// Emit a line for each attached component.
    pub components: bool,
}

impl DumpOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn components(mut self, components: bool) -> Self {
        self.components = components;
        self
    }
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            components: true,
        }
    }
}

/// Dump `scene`: a `Scene: <name>` header, then every root in order, each
/// starting one indent unit in.
///
/// An unloaded scene still prints its header but has no roots.
pub fn log_scene(world: &World, scene: Scene, sink: &mut impl LogSink) {
    log_scene_with(world, scene, &DumpOptions::default(), sink);
}

pub fn log_scene_with(world: &World, scene: Scene, options: &DumpOptions, sink: &mut impl LogSink) {
    let name = world.scene_name(scene).unwrap_or("<unknown>");
    sink.append_line(&format!("Scene: {name}"));
    for &root in world.root_entities(scene) {
        write_node(world, root, &options.indent, options, sink);
    }
}

/// Dump the subtree under `node`. The node's own lines start with `indent`
/// (conventionally [`DEFAULT_INDENT`]); each level below adds one more
/// [`DEFAULT_INDENT`]. Pass `""` to leave the top line unindented.
///
/// A dead node prints nothing.
pub fn log_subtree(world: &World, node: Entity, indent: &str, sink: &mut impl LogSink) {
    write_node(world, node, indent, &DumpOptions::default(), sink);
}

/// [`log_subtree`] with a custom indent unit and component switch.
pub fn log_subtree_with(
    world: &World,
    node: Entity,
    indent: &str,
    options: &DumpOptions,
    sink: &mut impl LogSink,
) {
    write_node(world, node, indent, options, sink);
}

fn write_node(
    world: &World,
    node: Entity,
    prefix: &str,
    options: &DumpOptions,
    sink: &mut impl LogSink,
) {
    let Some(name) = world.name(node) else {
        return;
    };
    sink.append_line(&format!("{prefix}{name}"));
    if options.components {
        for component in world.components(node) {
            sink.append_line(&format!(
                "{prefix}{}: {}",
                component.short_name(),
                component.describe()
            ));
        }
    }
    let child_prefix = format!("{prefix}{}", options.indent);
    for &child in world.children(node) {
        write_node(world, child, &child_prefix, options, sink);
    }
}

/// [`log_scene`] collected into a newline-separated `String`.
pub fn scene_structure(world: &World, scene: Scene, options: &DumpOptions) -> String {
    let mut lines: Vec<String> = Vec::new();
    log_scene_with(world, scene, options, &mut lines);
    lines.join("\n")
}

/// [`log_subtree_with`] collected into a newline-separated `String`, with
/// the top line unindented.
pub fn subtree_structure(world: &World, node: Entity, options: &DumpOptions) -> String {
    let mut lines: Vec<String> = Vec::new();
    log_subtree_with(world, node, "", options, &mut lines);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Damage(u32);

    #[derive(Debug)]
    struct Tag(&'static str);

    fn leading_tabs(line: &str) -> usize {
        line.chars().take_while(|&c| c == '\t').count()
    }

    #[test]
    fn three_levels_indent_one_unit_each() {
        let mut world = World::new();
        let root = world.spawn("root", ());
        let child = world.spawn_child(root, "child", ());
        world.spawn_child(child, "grandchild", ());

        let mut lines: Vec<String> = Vec::new();
        log_subtree(&world, root, "", &mut lines);

        assert_eq!(lines, vec!["root", "\tchild", "\t\tgrandchild"]);
        let depths: Vec<_> = lines.iter().map(|l| leading_tabs(l)).collect();
        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[test]
    fn components_follow_their_node() {
        let mut world = World::new();
        let root = world.spawn("player", (Damage(12), Tag("hero")));
        world.spawn_child(root, "sword", (Damage(30),));

        let mut lines: Vec<String> = Vec::new();
        log_subtree(&world, root, "", &mut lines);

        assert_eq!(
            lines,
            vec![
                "player",
                "Damage: Damage(12)",
                "Tag: Tag(\"hero\")",
                "\tsword",
                "\tDamage: Damage(30)",
            ]
        );
    }

    #[test]
    fn indent_argument_prefixes_every_line() {
        let mut world = World::new();
        let root = world.spawn("root", ());
        let child = world.spawn_child(root, "child", ());
        world.spawn_child(child, "leaf", ());

        let mut lines: Vec<String> = Vec::new();
        log_subtree(&world, root, "\t", &mut lines);
        assert_eq!(lines, vec!["\troot", "\t\tchild", "\t\t\tleaf"]);

        let mut lines: Vec<String> = Vec::new();
        log_subtree(&world, child, "> ", &mut lines);
        assert_eq!(lines, vec!["> child", "> \tleaf"]);
    }

    #[test]
    fn scene_header_then_roots_in_order() {
        let mut world = World::new();
        let scene = world.create_scene("level");
        let a = world.spawn_in(scene, "a", ());
        world.spawn_child(a, "a0", ());
        world.spawn_in(scene, "b", ());

        let options = DumpOptions::new().components(false);
        assert_eq!(
            scene_structure(&world, scene, &options),
            "Scene: level\n\ta\n\t\ta0\n\tb"
        );
    }

    #[test]
    fn unloaded_scene_prints_only_header() {
        let mut world = World::new();
        let scene = world.create_scene("gone");
        world.spawn_in(scene, "a", ());
        world.unload_scene(scene);

        let mut lines: Vec<String> = Vec::new();
        log_scene(&world, scene, &mut lines);
        assert_eq!(lines, vec!["Scene: gone"]);
    }

    #[test]
    fn dead_node_prints_nothing() {
        let mut world = World::new();
        let root = world.spawn("root", ());
        world.despawn(root);
        assert_eq!(subtree_structure(&world, root, &DumpOptions::default()), "");
    }

    #[test]
    fn custom_indent_unit() {
        let mut world = World::new();
        let root = world.spawn("root", ());
        world.spawn_child(root, "child", ());
        let options = DumpOptions::new().indent("  ").components(false);
        assert_eq!(subtree_structure(&world, root, &options), "root\n  child");
    }

    // ── Capturing logger ──

    struct CapturedLog {
        thread: std::thread::ThreadId,
        level: log::Level,
        target: String,
        message: String,
    }

    static CAPTURED: std::sync::Mutex<Vec<CapturedLog>> = std::sync::Mutex::new(Vec::new());

    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut captured) = CAPTURED.lock() {
                captured.push(CapturedLog {
                    thread: std::thread::current().id(),
                    level: record.level(),
                    target: record.target().to_string(),
                    message: format!("{}", record.args()),
                });
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;

    /// Tests run on parallel threads sharing one logger, so records are
    /// filtered to the calling thread.
    fn structure_lines_from_this_thread() -> Vec<(log::Level, String)> {
        let this = std::thread::current().id();
        CAPTURED
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.thread == this && c.target == "scenekit::structure")
            .map(|c| (c.level, c.message.clone()))
            .collect()
    }

    #[test]
    fn log_target_forwards_lines_at_info() {
        let _ = log::set_logger(&CAPTURE_LOGGER);
        log::set_max_level(log::LevelFilter::Trace);

        let mut world = World::new();
        let scene = world.create_scene("captured");
        let root = world.spawn_in(scene, "root", (Damage(3),));
        world.spawn_child(root, "child", ());

        log_scene(&world, scene, &mut LogTarget);

        let mut expected: Vec<String> = Vec::new();
        log_scene(&world, scene, &mut expected);
        let captured = structure_lines_from_this_thread();
        assert_eq!(
            captured.iter().map(|(_, m)| m.as_str()).collect::<Vec<_>>(),
            vec!["Scene: captured", "\troot", "\tDamage: Damage(3)", "\t\tchild"]
        );
        assert_eq!(
            captured.into_iter().map(|(_, m)| m).collect::<Vec<_>>(),
            expected
        );
        assert!(
            structure_lines_from_this_thread()
                .iter()
                .all(|(level, _)| *level == log::Level::Info)
        );
    }

    #[test]
    fn dump_does_not_mutate_world() {
        let mut world = World::new();
        let root = world.spawn("root", (Damage(1),));
        world.spawn_child(root, "child", ());
        let before = world.entity_count();
        log_subtree(&world, root, DEFAULT_INDENT, &mut LogTarget);
        assert_eq!(world.entity_count(), before);
        assert_eq!(world.children(root).len(), 1);
    }
}
