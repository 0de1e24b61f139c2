//! 同种板卡的集合

use crate::{Board, BoardError};
use std::collections::BTreeMap;
use std::ops::Index;
use tracing::error;

/// 同种板卡的集合，按序列号排序
#[derive(Debug, Clone)]
pub struct BoardGroup<B> {
    boards: BTreeMap<String, B>,
}

impl<B: Board> BoardGroup<B> {
    pub fn new(boards: impl IntoIterator<Item = B>) -> Self {
        Self {
            boards: boards
                .into_iter()
                .map(|b| (b.serial_number().to_string(), b))
                .collect(),
        }
    }

    /// 唯一的一块板卡
    ///
    /// # 错误
    /// - `BoardError::NotSingular`: 没有或有多块板卡
    pub fn singular(&self) -> Result<&B, BoardError> {
        let mut iter = self.boards.values();
        match (iter.next(), iter.next()) {
            (Some(board), None) => Ok(board),
            _ => Err(BoardError::NotSingular {
                kind: B::KIND,
                count: self.boards.len(),
            }),
        }
    }

    /// 按序列号查找
    pub fn get(&self, serial: &str) -> Option<&B> {
        self.boards.get(serial)
    }

    pub fn contains(&self, serial: &str) -> bool {
        self.boards.contains_key(serial)
    }

    /// 按序列号顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &B> {
        self.boards.values()
    }

    pub fn serial_numbers(&self) -> impl Iterator<Item = &str> {
        self.boards.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// 让组内所有板卡进入安全状态
    ///
    /// 某块板卡失败时继续处理其余板卡，返回第一个错误。
    pub fn make_safe(&self) -> Result<(), BoardError> {
        let mut first_error = None;
        for board in self.boards.values() {
            if let Err(e) = board.make_safe() {
                error!("Failed to make {} {} safe: {}", B::KIND, board.serial_number(), e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<B> Default for BoardGroup<B> {
    fn default() -> Self {
        Self {
            boards: BTreeMap::new(),
        }
    }
}

impl<B: Board> Index<&str> for BoardGroup<B> {
    type Output = B;

    /// # Panics
    /// 序列号不存在时 panic，需要容错时使用 [`BoardGroup::get`]。
    fn index(&self, serial: &str) -> &B {
        match self.boards.get(serial) {
            Some(board) => board,
            None => panic!("no {} with serial number {}", B::KIND, serial),
        }
    }
}

impl<'a, B: Board> IntoIterator for &'a BoardGroup<B> {
    type Item = &'a B;
    type IntoIter = std::collections::btree_map::Values<'a, String, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.boards.values()
    }
}
