//! Message bus following Game Engine Architecture Ch 16.8
//!
//! Key principles:
//! - Registration system (only notify handlers interested in a message kind)
//! - Immediate, synchronous delivery in subscription order
//! - Subscriptions are revoked through the handle returned at registration
//! - Delivery iterates a snapshot, so handlers may publish, subscribe or
//!   unsubscribe while a message is being delivered
//!
//! Structural changes (adding or destroying entities) are never applied by a
//! handler directly. Handlers push into a [`Mailbox`] and the owner drains it
//! at a tick boundary.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ecs::Entity;

/// Message kind identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// An entity was assembled and should join the world
    EntityAdded,
    /// An entity should leave the world at the end of the tick
    DestroyEntity,
    /// An entity entered the dead regime
    EntityDied,
    /// A respawned entity became active again
    EntityReappeared,
    /// Restart the current level
    ReloadLevel,
    /// Advance to the next level
    NextLevel,
    /// Go back to the previous level
    PreviousLevel,
    /// A level timer entity was created
    GameTimerStarted,
}

/// Message payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// See [`MessageKind::EntityAdded`]
    EntityAdded(Entity),
    /// See [`MessageKind::DestroyEntity`]
    DestroyEntity(Entity),
    /// See [`MessageKind::EntityDied`]
    EntityDied(Entity),
    /// See [`MessageKind::EntityReappeared`]
    EntityReappeared(Entity),
    /// See [`MessageKind::ReloadLevel`]
    ReloadLevel,
    /// See [`MessageKind::NextLevel`]
    NextLevel,
    /// See [`MessageKind::PreviousLevel`]
    PreviousLevel,
    /// See [`MessageKind::GameTimerStarted`]
    GameTimerStarted(Entity),
}

impl Message {
    /// Kind used for dispatch
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::EntityAdded(_) => MessageKind::EntityAdded,
            Self::DestroyEntity(_) => MessageKind::DestroyEntity,
            Self::EntityDied(_) => MessageKind::EntityDied,
            Self::EntityReappeared(_) => MessageKind::EntityReappeared,
            Self::ReloadLevel => MessageKind::ReloadLevel,
            Self::NextLevel => MessageKind::NextLevel,
            Self::PreviousLevel => MessageKind::PreviousLevel,
            Self::GameTimerStarted(_) => MessageKind::GameTimerStarted,
        }
    }

    /// Entity the message is about, if any
    pub const fn entity(&self) -> Option<Entity> {
        match self {
            Self::EntityAdded(entity)
            | Self::DestroyEntity(entity)
            | Self::EntityDied(entity)
            | Self::EntityReappeared(entity)
            | Self::GameTimerStarted(entity) => Some(*entity),
            Self::ReloadLevel | Self::NextLevel | Self::PreviousLevel => None,
        }
    }
}

type Handler = Rc<dyn Fn(&Message)>;

/// Registration handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    kind: MessageKind,
    id: u64,
}

impl Subscription {
    /// Kind this subscription listens to
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<MessageKind, Vec<(u64, Handler)>>,
}

/// Single-threaded publish/subscribe dispatcher
///
/// Interior mutability lets handlers reach the bus through a shared
/// reference while a message is in flight.
#[derive(Default)]
pub struct EventBus {
    registry: RefCell<Registry>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one message kind
    pub fn subscribe(&self, kind: MessageKind, handler: impl Fn(&Message) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.handlers.entry(kind).or_default().push((id, Rc::new(handler)));
        Subscription { kind, id }
    }

    /// Revoke a registration; false if it was already gone
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let mut registry = self.registry.borrow_mut();
        let Some(handlers) = registry.handlers.get_mut(&subscription.kind) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != subscription.id);
        before != handlers.len()
    }

    /// Deliver `message` to every current subscriber of its kind
    pub fn publish(&self, message: &Message) {
        let snapshot: Vec<Handler> = self
            .registry
            .borrow()
            .handlers
            .get(&message.kind())
            .map(|handlers| handlers.iter().map(|(_, handler)| Rc::clone(handler)).collect())
            .unwrap_or_default();

        log::trace!("publish {message:?} to {} subscriber(s)", snapshot.len());
        for handler in snapshot {
            handler(message);
        }
    }

    /// Number of handlers registered for `kind`
    pub fn subscriber_count(&self, kind: MessageKind) -> usize {
        self.registry.borrow().handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Drop every registration
    pub fn reset(&self) {
        self.registry.borrow_mut().handlers.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        let counts: HashMap<_, _> = registry.handlers.iter().map(|(kind, list)| (*kind, list.len())).collect();
        f.debug_struct("EventBus").field("subscribers", &counts).finish()
    }
}

/// Shared queue filled by message handlers and drained by its owner
#[derive(Debug)]
pub struct Mailbox<T> {
    items: Rc<RefCell<Vec<T>>>,
}

impl<T> Mailbox<T> {
    /// Create an empty mailbox
    pub fn new() -> Self {
        Self {
            items: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Queue an item
    pub fn push(&self, item: T) {
        self.items.borrow_mut().push(item);
    }

    /// Take every queued item
    pub fn drain(&self) -> Vec<T> {
        std::mem::take(&mut *self.items.borrow_mut())
    }

    /// Drop every queued item
    pub fn clear(&self) {
        self.items.borrow_mut().clear();
    }

    /// Number of queued items
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            items: Rc::clone(&self.items),
        }
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriptions owned by one consumer, revoked together
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe and remember the handle
    pub fn subscribe(&mut self, bus: &EventBus, kind: MessageKind, handler: impl Fn(&Message) + 'static) {
        self.subscriptions.push(bus.subscribe(kind, handler));
    }

    /// Forward every message of `kind` that names an entity into `mailbox`
    pub fn forward_entities(&mut self, bus: &EventBus, kind: MessageKind, mailbox: &Mailbox<Entity>) {
        let mailbox = mailbox.clone();
        self.subscribe(bus, kind, move |message| {
            if let Some(entity) = message.entity() {
                mailbox.push(entity);
            }
        });
    }

    /// Revoke every remembered subscription
    pub fn revoke_all(&mut self, bus: &EventBus) {
        for subscription in self.subscriptions.drain(..) {
            bus.unsubscribe(&subscription);
        }
    }

    /// Number of live handles
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether no handle is held
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
