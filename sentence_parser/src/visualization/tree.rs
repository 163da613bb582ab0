use std::io::Write;
use std::path::Path;
use std::process::Stdio;

use itertools::Itertools;
use unicode_width::UnicodeWidthStr;

use descentparse::Tree;

struct Counter(usize);

impl Counter {
    fn peek(&self) -> usize {
        self.0
    }

    fn next(&mut self) -> usize {
        self.0 += 1;
        self.0
    }
}

struct Edge {
    color: String,
    from_id: String,
    to_id: String,
    style: Option<String>,
}

struct Node {
    id: String,
    label: String,
    shape: String,
    color: String,
}

impl Edge {
    fn prop_str(&self) -> String {
        [
            ("color", Some(self.color.as_str())),
            ("arrowhead", Some("none")),
            ("style", self.style.as_deref()),
        ]
        .iter()
        .filter_map(|(key, val)| val.map(|val| format!("{}=\"{}\"", key, val)))
        .join(" ")
    }

    fn to_dot(&self) -> String {
        format!("{} -> {} [{}]", self.from_id, self.to_id, self.prop_str())
    }
}

impl Node {
    fn prop_str(&self) -> String {
        [
            ("label", &escape(&self.label)),
            ("shape", &self.shape),
            ("color", &self.color),
            ("fontcolor", &self.color),
        ]
        .iter()
        .map(|(key, val)| format!("{}=\"{}\"", key, val))
        .join(" ")
    }

    fn to_dot(&self) -> String {
        format!("{} [{}]", self.id, self.prop_str())
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

enum Item {
    Node(Node),
    Edge(Edge),
}

fn tree_to_graph_helper(
    tree: &Tree<String>,
    counter: &mut Counter,
    leaf_color: &str,
    items: &mut Vec<Item>,
) {
    let id = counter.peek();
    if tree.is_leaf() {
        items.push(Item::Node(Node {
            id: id.to_string(),
            label: tree.value().clone(),
            shape: "box".to_string(),
            color: leaf_color.to_string(),
        }));
        return;
    }

    let color = tag_color(tree.value());
    items.push(Item::Node(Node {
        id: id.to_string(),
        label: tree.value().clone(),
        shape: "none".to_string(),
        color: color.to_string(),
    }));
    for child in tree.children() {
        let child_id = counter.next();
        let style = if child.is_leaf() {
            None
        } else {
            Some("bold".to_string())
        };
        items.push(Item::Edge(Edge {
            color: color.to_string(),
            from_id: id.to_string(),
            to_id: child_id.to_string(),
            style,
        }));

        tree_to_graph_helper(child, counter, color, items);
    }
}

fn tree_to_graph(tree: &Tree<String>) -> Vec<Item> {
    let mut items = Vec::new();
    tree_to_graph_helper(tree, &mut Counter(0), "#000000", &mut items);
    items
}

/// Graphviz source for `tree`, one statement per line.
pub fn to_dot(tree: &Tree<String>) -> String {
    let body = tree_to_graph(tree)
        .into_iter()
        .map(|x| match x {
            Item::Node(n) => n.to_dot(),
            Item::Edge(e) => e.to_dot(),
        })
        .join("\n");
    format!("digraph {{\n{}\n}}\n", body)
}

/// Pipes the tree through `dot`, writing the output format implied by the
/// extension of `path` (pdf when there is none).
pub fn render_tree<P: AsRef<Path>>(tree: &Tree<String>, path: P) -> std::io::Result<()> {
    let file_format = match path.as_ref().extension() {
        None => "pdf",
        Some(ext) => ext.to_str().unwrap_or("pdf"),
    };
    let mut cmd = std::process::Command::new("dot")
        .arg(format!("-T{}", file_format))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;
    if let Some(stdin) = cmd.stdin.as_mut() {
        stdin.write_all(to_dot(tree).as_bytes())?;
    }
    let output = cmd.wait_with_output()?;
    if !output.status.success() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("dot exited with {}", output.status),
        ));
    }
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, output.stdout)
}

/// Colors by the usual part-of-speech naming: nouns green, verbs orange,
/// determiners grey.
pub fn tag_color(sym: &str) -> &'static str {
    let lower = sym.to_lowercase();
    match lower.as_str() {
        "det" | "dt" | "cc" => "#b0b0b0",
        "adj" | "jj" => "#00dd00",
        "adv" | "rb" => "#ff9a57",
        "s" => "#000000",
        x if x.starts_with("np") || x.starts_with("pro") || x.starts_with('n') => "#00AA00",
        x if x.starts_with("vp") || x.starts_with('v') => "#FF8B3D",
        x if x.starts_with("pp") || x.starts_with('p') => "#E3242B",
        _ => "#000000",
    }
}

/// One label per line, indented two spaces per level.
pub fn to_indented(tree: &Tree<String>) -> String {
    tree.labels()
        .map(|(depth, label)| format!("{}{}", "  ".repeat(depth), label))
        .join("\n")
}

const GAP: usize = 2;

struct Block<'a> {
    label: &'a str,
    width: usize,
    children: Vec<Block<'a>>,
}

impl<'a> Block<'a> {
    fn new(tree: &'a Tree<String>) -> Self {
        let children: Vec<_> = tree.children().iter().map(Block::new).collect();
        let label_width = tree.value().width();
        Block {
            label: tree.value(),
            width: label_width.max(children_width(&children)),
            children,
        }
    }

    fn label_column(&self, x: usize) -> usize {
        x + (self.width - self.label.width()) / 2
    }

    fn center(&self, x: usize) -> usize {
        self.label_column(x) + self.label.width().saturating_sub(1) / 2
    }

    /// Places this block with its left edge at `x`, labels on even rows and
    /// connectors on the odd row below each parent.
    fn place(&self, x: usize, row: usize, rows: &mut Vec<Vec<(usize, String)>>) {
        if rows.len() <= row + 1 {
            rows.resize_with(row + 2, Vec::new);
        }
        rows[row].push((self.label_column(x), self.label.to_string()));
        if self.children.is_empty() {
            return;
        }

        let mut child_x = x + (self.width - children_width(&self.children)) / 2;
        let mut centers = Vec::with_capacity(self.children.len());
        for child in &self.children {
            centers.push(child.center(child_x));
            child.place(child_x, row + 2, rows);
            child_x += child.width + GAP;
        }

        let (first, last) = (centers[0], centers[centers.len() - 1]);
        let connector: String = if first == last {
            "|".to_string()
        } else {
            (first..=last)
                .map(|col| if centers.contains(&col) { '+' } else { '-' })
                .collect()
        };
        rows[row + 1].push((first, connector));
    }
}

fn children_width(children: &[Block]) -> usize {
    if children.is_empty() {
        return 0;
    }
    children.iter().map(|c| c.width).sum::<usize>() + GAP * (children.len() - 1)
}

/// Top-down drawing with every label centered over its subtree.
pub fn to_pretty(tree: &Tree<String>) -> String {
    let block = Block::new(tree);
    let mut rows = Vec::new();
    block.place(0, 0, &mut rows);

    rows.into_iter()
        .filter(|row| !row.is_empty())
        .map(|mut row| {
            row.sort_by_key(|(col, _)| *col);
            let mut line = String::new();
            let mut cursor = 0;
            for (col, text) in row {
                line.push_str(&" ".repeat(col.saturating_sub(cursor)));
                cursor = cursor.max(col) + text.width();
                line.push_str(&text);
            }
            line
        })
        .join("\n")
}
