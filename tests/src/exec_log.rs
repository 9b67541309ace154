use crate::logging_driver::DriverOp;
use gust_core::{
    driver::{
        operation::{Insert, Transaction},
        Operation,
    },
    schema::app::ModelId,
};
use std::sync::{Arc, Mutex};

/// A wrapper around the operations log that provides a clean API for tests
pub struct ExecLog {
    ops: Arc<Mutex<Vec<DriverOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<DriverOp>>>) -> Self {
        Self { ops }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Check if any operation matches the given predicate
    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .any(|op| predicate(&op.operation))
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| predicate(&op.operation))
            .count()
    }

    pub fn has_insert(&self) -> bool {
        self.any(|op| matches!(op, Operation::Insert(_)))
    }

    pub fn has_update_by_key(&self) -> bool {
        self.any(|op| matches!(op, Operation::UpdateByKey(_)))
    }

    pub fn has_delete_by_key(&self) -> bool {
        self.any(|op| matches!(op, Operation::DeleteByKey(_)))
    }

    pub fn has_rollback(&self) -> bool {
        self.any(|op| matches!(op, Operation::Transaction(Transaction::Rollback)))
    }

    pub fn has_commit(&self) -> bool {
        self.any(|op| matches!(op, Operation::Transaction(Transaction::Commit)))
    }

    /// Models touched by write operations, in execution order. Failed
    /// operations are included.
    pub fn writes(&self) -> Vec<(&'static str, ModelId)> {
        self.with_ops(|ops| {
            ops.iter()
                .filter_map(|op| match &op.operation {
                    Operation::Insert(op) => Some(("insert", op.model)),
                    Operation::UpdateByKey(op) => Some(("update", op.model)),
                    Operation::DeleteByKey(op) => Some(("delete", op.model)),
                    _ => None,
                })
                .collect()
        })
    }

    /// Insert operations, in execution order
    pub fn inserts(&self) -> Vec<Insert> {
        self.with_ops(|ops| {
            ops.iter()
                .filter_map(|op| match &op.operation {
                    Operation::Insert(insert) => Some(insert.clone()),
                    _ => None,
                })
                .collect()
        })
    }

    /// The transaction start, if any
    pub fn transaction_start(&self) -> Option<Transaction> {
        self.with_ops(|ops| {
            ops.iter().find_map(|op| match &op.operation {
                Operation::Transaction(start @ Transaction::Start { .. }) => Some(start.clone()),
                _ => None,
            })
        })
    }

    pub fn clear(&mut self) {
        self.ops.lock().unwrap().clear();
    }

    /// Remove and return the first operation from the log
    pub fn pop(&mut self) -> Option<DriverOp> {
        let mut ops = self.ops.lock().unwrap();
        if ops.is_empty() {
            None
        } else {
            Some(ops.remove(0))
        }
    }

    /// Get access to all operations for custom assertions
    pub fn with_ops<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[DriverOp]) -> R,
    {
        let ops = self.ops.lock().unwrap();
        f(&ops)
    }
}
