//! # Session 模块
//!
//! 进程内的会话频道，模拟多客户端之间的广播。
//!
//! 消息以 JSON 值的形式投递，接收方自行用
//! [`ChannelMessage::parse`](transition_runtime::ChannelMessage::parse) 解析。
//! 广播只投递给其他端点，不回送给发送者。

use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use tracing::debug;
use transition_runtime::{CHANNEL, ChannelMessage};

/// 广播出口
pub trait Messenger {
    fn broadcast(&mut self, message: &ChannelMessage);
}

#[derive(Debug, Default)]
struct BusState {
    inboxes: BTreeMap<usize, VecDeque<Value>>,
    next_endpoint: usize,
    delivered: u64,
}

/// 会话频道
#[derive(Debug, Clone, Default)]
pub struct SessionBus {
    state: Rc<RefCell<BusState>>,
}

impl SessionBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 接入一个新端点
    pub fn connect(&self) -> BusEndpoint {
        let mut state = self.state.borrow_mut();
        let id = state.next_endpoint;
        state.next_endpoint += 1;
        state.inboxes.insert(id, VecDeque::new());
        debug!(endpoint = id, channel = CHANNEL, "端点接入");
        BusEndpoint {
            id,
            state: Rc::clone(&self.state),
        }
    }

    /// 当前端点数
    pub fn endpoint_count(&self) -> usize {
        self.state.borrow().inboxes.len()
    }

    /// 累计投递次数
    pub fn delivered(&self) -> u64 {
        self.state.borrow().delivered
    }
}

/// 会话频道的一个端点
#[derive(Debug)]
pub struct BusEndpoint {
    id: usize,
    state: Rc<RefCell<BusState>>,
}

impl BusEndpoint {
    pub fn id(&self) -> usize {
        self.id
    }

    /// 广播原始 JSON 值
    pub fn send_value(&mut self, value: Value) {
        let mut state = self.state.borrow_mut();
        let mut delivered = 0;
        for (&id, inbox) in state.inboxes.iter_mut() {
            if id != self.id {
                inbox.push_back(value.clone());
                delivered += 1;
            }
        }
        state.delivered += delivered;
        debug!(from = self.id, delivered, "广播消息");
    }

    /// 取出收件箱中的全部消息
    pub fn drain(&mut self) -> Vec<Value> {
        self.state
            .borrow_mut()
            .inboxes
            .get_mut(&self.id)
            .map(|inbox| inbox.drain(..).collect())
            .unwrap_or_default()
    }
}

impl Messenger for BusEndpoint {
    fn broadcast(&mut self, message: &ChannelMessage) {
        self.send_value(message.to_value());
    }
}

impl Drop for BusEndpoint {
    fn drop(&mut self) {
        self.state.borrow_mut().inboxes.remove(&self.id);
    }
}
