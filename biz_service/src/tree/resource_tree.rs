use crate::entitys::menu_entity::{MenuGroup, ResourceMenu};
use log::warn;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

/// 树节点：原始菜单记录 + 层级 + 按 sequence 排好的子节点
#[derive(Debug, Clone, PartialEq)]
pub struct MenuNode {
    pub menu: ResourceMenu,
    /// 根节点为 1
    pub level: u32,
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    pub fn id(&self) -> &str {
        &self.menu.id
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
struct NodeMeta {
    /// 解析后的父节点，父节点不在当前集合里时为 None
    parent: Option<String>,
    sequence: f64,
    is_deleted: bool,
    children: Vec<String>,
}

/// 根节点按展示分组拆开
#[derive(Debug, Default)]
pub struct TreeGroups<'a> {
    pub menu: Vec<&'a MenuNode>,
    pub system: Vec<&'a MenuNode>,
}

/// 由扁平列表构建的资源树，只读
#[derive(Debug, Clone, Default)]
pub struct ResourceTree {
    roots: Vec<MenuNode>,
    root_ids: Vec<String>,
    index: HashMap<String, NodeMeta>,
}

fn by_sequence(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

impl ResourceTree {
    /// 1. 按 id 建索引
    /// 2. parentId 能解析到其它节点的挂到该节点下，否则作为根
    /// 3. 每一层按 sequence 升序
    /// 4. 分组在 groups() 中按类型拆分
    pub fn build(menus: Vec<ResourceMenu>) -> Self {
        let mut by_id: HashMap<String, ResourceMenu> = HashMap::with_capacity(menus.len());
        let mut order: Vec<String> = Vec::with_capacity(menus.len());
        for menu in menus {
            if by_id.contains_key(&menu.id) {
                warn!("duplicate resource id {} ignored", menu.id);
                continue;
            }
            order.push(menu.id.clone());
            by_id.insert(menu.id.clone(), menu);
        }

        let seq_of = |id: &str| by_id.get(id).map_or(0.0, |m| m.sequence);
        let mut roots: Vec<String> = Vec::new();
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for id in &order {
            let parent = by_id
                .get(id)
                .and_then(|m| m.parent())
                .filter(|p| *p != id.as_str() && by_id.contains_key(*p));
            match parent {
                Some(parent) => children.entry(parent.to_string()).or_default().push(id.clone()),
                None => roots.push(id.clone()),
            }
        }
        roots.sort_by(|a, b| by_sequence(seq_of(a.as_str()), seq_of(b.as_str())));
        for list in children.values_mut() {
            list.sort_by(|a, b| by_sequence(seq_of(a.as_str()), seq_of(b.as_str())));
        }

        let mut visited: HashSet<String> = HashSet::with_capacity(order.len());
        let mut root_nodes: Vec<MenuNode> = Vec::with_capacity(roots.len());
        for id in &roots {
            if let Some(node) = assemble(id, 1, &by_id, &children, &mut visited) {
                root_nodes.push(node);
            }
        }
        // 父子关系成环的节点从任何根都走不到，当作根挂出来
        for id in &order {
            if visited.contains(id) {
                continue;
            }
            warn!("resource {} is part of a parent cycle, shown as root", id);
            if let Some(node) = assemble(id, 1, &by_id, &children, &mut visited) {
                root_nodes.push(node);
            }
        }
        root_nodes.sort_by(|a, b| by_sequence(a.menu.sequence, b.menu.sequence));

        let mut tree = ResourceTree { roots: root_nodes, ..Default::default() };
        tree.reindex();
        tree
    }

    fn reindex(&mut self) {
        fn walk(node: &MenuNode, parent: Option<&str>, index: &mut HashMap<String, NodeMeta>) {
            index.insert(
                node.menu.id.clone(),
                NodeMeta {
                    parent: parent.map(str::to_string),
                    sequence: node.menu.sequence,
                    is_deleted: node.menu.is_deleted,
                    children: node.children.iter().map(|c| c.menu.id.clone()).collect(),
                },
            );
            for child in &node.children {
                walk(child, Some(&node.menu.id), index);
            }
        }
        let mut index = HashMap::new();
        for root in &self.roots {
            walk(root, None, &mut index);
        }
        self.root_ids = self.roots.iter().map(|r| r.menu.id.clone()).collect();
        self.index = index;
    }

    pub fn roots(&self) -> &[MenuNode] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_root(&self, id: &str) -> bool {
        self.index.get(id).is_some_and(|m| m.parent.is_none())
    }

    pub fn is_deleted(&self, id: &str) -> bool {
        self.index.get(id).is_some_and(|m| m.is_deleted)
    }

    pub fn parent_id_of(&self, id: &str) -> Option<&str> {
        self.index.get(id).and_then(|m| m.parent.as_deref())
    }

    pub fn sequence_of(&self, id: &str) -> Option<f64> {
        self.index.get(id).map(|m| m.sequence)
    }

    /// 从根到 id 的路径（含 id 本身）
    pub fn ancestry(&self, id: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self.index.get_key_value(id).map(|(k, _)| k.as_str());
        while let Some(cur) = current {
            if chain.len() > self.index.len() {
                break;
            }
            chain.push(cur);
            current = self.parent_id_of(cur);
        }
        chain.reverse();
        chain
    }

    pub fn find(&self, id: &str) -> Option<&MenuNode> {
        let path = self.ancestry(id);
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.iter().find(|n| n.id() == *first)?;
        for step in rest {
            node = node.children.iter().find(|n| n.id() == *step)?;
        }
        Some(node)
    }

    /// 与 id 同一父节点的全部节点（含自身），按 sequence 排序
    pub fn siblings(&self, id: &str) -> Vec<&str> {
        let Some(meta) = self.index.get(id) else {
            return Vec::new();
        };
        let list = match &meta.parent {
            Some(parent) => self.index.get(parent).map(|p| p.children.as_slice()).unwrap_or(&[]),
            None => self.root_ids.as_slice(),
        };
        list.iter().map(String::as_str).collect()
    }

    pub fn previous_sibling(&self, id: &str) -> Option<&str> {
        let siblings = self.siblings(id);
        let pos = siblings.iter().position(|s| *s == id)?;
        if pos == 0 { None } else { Some(siblings[pos - 1]) }
    }

    pub fn next_sibling(&self, id: &str) -> Option<&str> {
        let siblings = self.siblings(id);
        let pos = siblings.iter().position(|s| *s == id)?;
        siblings.get(pos + 1).copied()
    }

    /// candidate 是否在 ancestor 的子树里（不含 ancestor 本身）
    pub fn is_descendant(&self, ancestor: &str, candidate: &str) -> bool {
        if ancestor == candidate {
            return false;
        }
        self.ancestry(candidate).contains(&ancestor)
    }

    pub fn groups(&self) -> TreeGroups<'_> {
        let mut groups = TreeGroups::default();
        for root in &self.roots {
            match root.menu.display_group() {
                MenuGroup::Menu => groups.menu.push(root),
                MenuGroup::System => groups.system.push(root),
            }
        }
        groups
    }

    /// 深度优先展开全部节点
    pub fn flatten(&self) -> Vec<&MenuNode> {
        fn walk<'a>(node: &'a MenuNode, out: &mut Vec<&'a MenuNode>) {
            out.push(node);
            for child in &node.children {
                walk(child, out);
            }
        }
        let mut out = Vec::with_capacity(self.len());
        for root in &self.roots {
            walk(root, &mut out);
        }
        out
    }

    /// 只展开 expanded 中的节点，根节点总是可见
    pub fn visible_rows(&self, expanded: &BTreeSet<String>) -> Vec<&MenuNode> {
        fn walk<'a>(node: &'a MenuNode, expanded: &BTreeSet<String>, out: &mut Vec<&'a MenuNode>) {
            out.push(node);
            if expanded.contains(node.id()) {
                for child in &node.children {
                    walk(child, expanded, out);
                }
            }
        }
        let mut out = Vec::new();
        for root in &self.roots {
            walk(root, expanded, &mut out);
        }
        out
    }
}

fn assemble(
    id: &str,
    level: u32,
    by_id: &HashMap<String, ResourceMenu>,
    children: &HashMap<String, Vec<String>>,
    visited: &mut HashSet<String>,
) -> Option<MenuNode> {
    let menu = by_id.get(id)?;
    visited.insert(id.to_string());
    let mut node = MenuNode { menu: menu.clone(), level, children: Vec::new() };
    for child in children.get(id).map(Vec::as_slice).unwrap_or(&[]) {
        if visited.contains(child) {
            continue;
        }
        if let Some(child_node) = assemble(child, level + 1, by_id, children, visited) {
            node.children.push(child_node);
        }
    }
    Some(node)
}
