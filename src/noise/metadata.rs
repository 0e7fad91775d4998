//! Node class metadata collected from the native library
//!
//! FastNoise2 通过 C 接口暴露每种节点的成员列表。成员分三类，
//! 各自有独立的下标空间：variables（float/int/enum）、node lookups、hybrids。

use crate::native::api::FastNoiseApi;
use log::{debug, warn};
use std::collections::HashMap;

const DIMENSION_SUFFIX: [char; 4] = ['x', 'y', 'z', 'w'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberType {
    Float,
    Int,
    Enum,
    NodeLookup,
    Hybrid,
}

impl MemberType {
    /// 原生 variable 类型：0 float, 1 int, 2 enum
    #[inline]
    pub fn from_variable_type(id: i32) -> Option<Self> {
        match id {
            0 => Some(MemberType::Float),
            1 => Some(MemberType::Int),
            2 => Some(MemberType::Enum),
            _ => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            MemberType::Float => "a float value",
            MemberType::Int => "an int value",
            MemberType::Enum => "an enum value",
            MemberType::NodeLookup => "a node lookup",
            MemberType::Hybrid => "a float value or a node lookup",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub member_type: MemberType,
    /// 在所属类别里的下标，直接传给原生 setter
    pub index: i32,
    pub enum_names: HashMap<String, i32>,
}

impl Member {
    pub fn new(name: String, member_type: MemberType, index: i32) -> Self {
        Self {
            name,
            member_type,
            index,
            enum_names: HashMap::new(),
        }
    }

    pub fn enum_index(&self, value: &str) -> Option<i32> {
        self.enum_names.get(&format_lookup(value)).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub id: i32,
    pub name: String,
    pub members: HashMap<String, Member>,
}

impl Metadata {
    pub fn new(id: i32, name: String) -> Self {
        Self {
            id,
            name,
            members: HashMap::new(),
        }
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(&format_lookup(name))
    }

    fn insert(&mut self, member: Member) {
        if let Some(previous) = self.members.insert(member.name.clone(), member) {
            debug!("Metadata {}: member {} shadowed by a later member", self.name, previous.name);
        }
    }
}

/// 去空格并转小写，"Fractal FBm" 和 "fractalfbm" 视为同一个名字
pub fn format_lookup(s: &str) -> String {
    s.chars().filter(|c| *c != ' ').collect::<String>().to_lowercase()
}

/// 带维度的成员追加 x/y/z/w 后缀，例如 Offset + 0 -> offsetx
pub fn format_dimension_member(name: &str, dimension_idx: i32) -> String {
    match usize::try_from(dimension_idx).ok().and_then(|idx| DIMENSION_SUFFIX.get(idx)) {
        Some(suffix) => format!("{}{}", name, suffix),
        None => name.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    metadata: Vec<Metadata>,
    name_lookup: HashMap<String, usize>,
}

impl MetadataRegistry {
    /// 遍历原生库里注册的所有节点类型
    pub fn collect(api: &FastNoiseApi) -> Self {
        let count = api.metadata_count().max(0);
        let mut metadata = Vec::with_capacity(count as usize);
        let mut name_lookup = HashMap::with_capacity(count as usize);

        for id in 0..count {
            let mut node = Metadata::new(id, format_lookup(&api.metadata_name(id)));

            for variable_idx in 0..api.variable_count(id) {
                let raw_type = api.variable_type(id, variable_idx);
                let Some(member_type) = MemberType::from_variable_type(raw_type) else {
                    warn!(
                        "Metadata {}: skipping variable {} with unknown type {}",
                        node.name, variable_idx, raw_type
                    );
                    continue;
                };

                let name = format_dimension_member(
                    &format_lookup(&api.variable_name(id, variable_idx)),
                    api.variable_dimension_idx(id, variable_idx),
                );
                let mut member = Member::new(name, member_type, variable_idx);

                if member_type == MemberType::Enum {
                    let enum_count = api.enum_count(id, variable_idx).max(0);
                    member.enum_names = (0..enum_count)
                        .map(|enum_idx| (format_lookup(&api.enum_name(id, variable_idx, enum_idx)), enum_idx))
                        .collect();
                }

                node.insert(member);
            }

            for lookup_idx in 0..api.node_lookup_count(id) {
                let name = format_dimension_member(
                    &format_lookup(&api.node_lookup_name(id, lookup_idx)),
                    api.node_lookup_dimension_idx(id, lookup_idx),
                );
                node.insert(Member::new(name, MemberType::NodeLookup, lookup_idx));
            }

            for hybrid_idx in 0..api.hybrid_count(id) {
                let name = format_dimension_member(
                    &format_lookup(&api.hybrid_name(id, hybrid_idx)),
                    api.hybrid_dimension_idx(id, hybrid_idx),
                );
                node.insert(Member::new(name, MemberType::Hybrid, hybrid_idx));
            }

            name_lookup.insert(node.name.clone(), metadata.len());
            metadata.push(node);
        }

        debug!("Collected metadata for {} FastNoise node types", metadata.len());

        Self { metadata, name_lookup }
    }

    pub fn find_id(&self, name: &str) -> Option<i32> {
        self.name_lookup
            .get(&format_lookup(name))
            .map(|&idx| self.metadata[idx].id)
    }

    pub fn get(&self, id: i32) -> Option<&Metadata> {
        usize::try_from(id).ok().and_then(|idx| self.metadata.get(idx))
    }

    /// 只用于构造时已经校验过的 id
    pub(crate) fn by_valid_id(&self, id: i32) -> &Metadata {
        &self.metadata[id as usize]
    }

    pub fn find(&self, name: &str) -> Option<&Metadata> {
        self.name_lookup.get(&format_lookup(name)).map(|&idx| &self.metadata[idx])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metadata.iter().map(|m| m.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Metadata> {
        self.metadata.iter()
    }
}
