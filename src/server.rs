//! Animation server - registry, synchronized clock and value links
//!
//! The server owns every live element, drives them once per tick and keeps
//! the standing links between their attributes alive.
//!
//! Structural changes are deferred: deleting an element only marks it, the
//! entry is dropped during the maintenance pass at the start of the next
//! tick. Lookups never see marked elements.

use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::Color;
use crate::command::{self, ColorCommand, Command, FloatCommand};
use crate::element::{Element, ElementSlot, Frame};
use crate::id::{ElementId, GlobalAddress};
use crate::link::{ColorOp, CopyOp, Easing};
use crate::surface::MatrixSurface;

/// Lifetime of a registry entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lifetime {
    Alive,
    /// Deleted once the clock passes the given time
    Expires(f32),
    /// Marked for removal at the next maintenance pass
    Deleted,
}

#[derive(Debug)]
struct Entry {
    id: ElementId,
    z: i8,
    lifetime: Lifetime,
    element: ElementSlot,
}

impl Entry {
    fn is_live(&self, clock: f32) -> bool {
        match self.lifetime {
            Lifetime::Alive => true,
            Lifetime::Expires(deadline) => deadline >= clock,
            Lifetime::Deleted => false,
        }
    }
}

/// Registry of animation elements
///
/// `MAX_ELEMENTS` bounds the registry (marked entries count until they are
/// dropped), `MAX_LINKS` bounds float and color links each.
pub struct AnimationServer<const MAX_ELEMENTS: usize, const MAX_LINKS: usize> {
    elements: Vec<Entry, MAX_ELEMENTS>,
    copy_ops: Vec<CopyOp, MAX_LINKS>,
    color_ops: Vec<ColorOp, MAX_LINKS>,
    clock: f32,
}

impl<const MAX_ELEMENTS: usize, const MAX_LINKS: usize> Default
    for AnimationServer<MAX_ELEMENTS, MAX_LINKS>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const MAX_ELEMENTS: usize, const MAX_LINKS: usize> AnimationServer<MAX_ELEMENTS, MAX_LINKS> {
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
            copy_ops: Vec::new(),
            color_ops: Vec::new(),
            clock: 0.0,
        }
    }

    /// Synchronized clock in seconds
    pub const fn clock(&self) -> f32 {
        self.clock
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.elements
            .iter()
            .filter(|entry| entry.is_live(self.clock))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register an element at depth 0
    ///
    /// See [`Self::insert_at_depth`].
    pub fn insert(
        &mut self,
        id: ElementId,
        element: impl Into<ElementSlot>,
    ) -> Result<(), ElementSlot> {
        self.insert_at_depth(id, 0, element)
    }

    /// Register an element, replacing any live element with the same id
    ///
    /// Elements are advanced in ascending `z`, and in insertion order for
    /// equal `z`. Returns the element if the registry is full.
    pub fn insert_at_depth(
        &mut self,
        id: ElementId,
        z: i8,
        element: impl Into<ElementSlot>,
    ) -> Result<(), ElementSlot> {
        let element = element.into();
        if self.elements.is_full() {
            #[cfg(feature = "esp32-log")]
            println!("[AnimationServer.insert] registry full, dropping {:?}", id);
            return Err(element);
        }

        self.delete(id);

        let position = self
            .elements
            .iter()
            .position(|entry| entry.z > z)
            .unwrap_or(self.elements.len());
        let entry = Entry {
            id,
            z,
            lifetime: Lifetime::Alive,
            element,
        };

        #[cfg(feature = "esp32-log")]
        println!("[AnimationServer.insert] {:?} at depth {}", id, z);
        self.elements
            .insert(position, entry)
            .map_err(|entry| entry.element)
    }

    /// Find a live element
    pub fn find(&self, id: ElementId) -> Option<&ElementSlot> {
        self.elements
            .iter()
            .find(|entry| entry.id == id && entry.is_live(self.clock))
            .map(|entry| &entry.element)
    }

    /// Find a live element for mutation
    pub fn find_mut(&mut self, id: ElementId) -> Option<&mut ElementSlot> {
        live_entry(&mut self.elements, self.clock, id).map(|entry| &mut entry.element)
    }

    /// Lifetime of the live entry with this id, or of a marked one
    pub fn lifetime(&self, id: ElementId) -> Option<Lifetime> {
        self.elements
            .iter()
            .find(|entry| entry.id == id && entry.is_live(self.clock))
            .or_else(|| self.elements.iter().rev().find(|entry| entry.id == id))
            .map(|entry| entry.lifetime)
    }

    /// Mark an element for removal at the next tick
    ///
    /// Links to or from the element are dropped right away.
    /// Returns `false` if no such element exists.
    pub fn delete(&mut self, id: ElementId) -> bool {
        let mut found = false;
        for entry in &mut self.elements {
            if entry.id == id && entry.lifetime != Lifetime::Deleted {
                entry.lifetime = Lifetime::Deleted;
                found = true;
            }
        }

        if found {
            #[cfg(feature = "esp32-log")]
            println!("[AnimationServer.delete] {:?}", id);
            self.unlink_element(id);
        }
        found
    }

    /// Mark every element of a set for removal
    ///
    /// Returns the number of marked elements.
    pub fn delete_set(&mut self, set_id: u8) -> usize {
        let mut marked: Vec<ElementId, MAX_ELEMENTS> = Vec::new();
        for entry in &mut self.elements {
            if entry.id.set_id == set_id && entry.lifetime != Lifetime::Deleted {
                entry.lifetime = Lifetime::Deleted;
                // Capacity matches the registry
                let _ = marked.push(entry.id);
            }
        }

        for id in &marked {
            self.unlink_element(*id);
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "[AnimationServer.delete_set] set {} ({} elements)",
            set_id,
            marked.len()
        );
        marked.len()
    }

    /// Delete a live element once the clock has advanced by `seconds`
    pub fn expire_after(&mut self, id: ElementId, seconds: f32) -> bool {
        let deadline = self.clock + seconds;
        let Some(entry) = live_entry(&mut self.elements, self.clock, id) else {
            return false;
        };
        entry.lifetime = Lifetime::Expires(deadline);
        true
    }

    /// Cancel a pending expiry
    pub fn cancel_expiry(&mut self, id: ElementId) -> bool {
        let Some(entry) = live_entry(&mut self.elements, self.clock, id) else {
            return false;
        };
        entry.lifetime = Lifetime::Alive;
        true
    }

    /// Resolve a float attribute anywhere in the registry
    pub fn resolve_float(&mut self, address: GlobalAddress) -> Option<&mut f32> {
        resolve_float(&mut self.elements, self.clock, address)
    }

    /// Read a float attribute anywhere in the registry
    pub fn read_float(&mut self, address: GlobalAddress) -> Option<f32> {
        self.resolve_float(address).map(|value| *value)
    }

    /// Resolve a color attribute anywhere in the registry
    pub fn resolve_color(&mut self, address: GlobalAddress) -> Option<&mut Color> {
        resolve_color(&mut self.elements, self.clock, address)
    }

    /// Write a float attribute
    ///
    /// A linked attribute takes the value as its link's additive offset
    /// instead. Returns `false` if the attribute does not exist.
    pub fn set_float(&mut self, address: GlobalAddress, value: f32) -> bool {
        let Some(target) = resolve_float(&mut self.elements, self.clock, address) else {
            return false;
        };
        match self
            .copy_ops
            .iter_mut()
            .find(|op| op.destination == address)
        {
            Some(op) => op.add_offset = value,
            None => *target = value,
        }
        true
    }

    /// Write a color attribute
    ///
    /// A fading attribute takes the color as its fade target instead.
    /// Returns `false` if the attribute does not exist.
    pub fn set_color(&mut self, address: GlobalAddress, color: Color) -> bool {
        let Some(target) = resolve_color(&mut self.elements, self.clock, address) else {
            return false;
        };
        match self
            .color_ops
            .iter_mut()
            .find(|op| op.destination == address)
        {
            Some(op) => op.target = color,
            None => *target = color,
        }
        true
    }

    /// Replace the text of an element
    pub fn set_text(&mut self, id: ElementId, text: &str) -> bool {
        let Some(element) = self.find_mut(id) else {
            return false;
        };
        element.set_text(text);
        true
    }

    /// Create or replace the float link into `op.destination`
    ///
    /// Fails if the destination does not exist or no link slot is left.
    pub fn link_float(&mut self, op: CopyOp) -> bool {
        if resolve_float(&mut self.elements, self.clock, op.destination).is_none() {
            return false;
        }
        if let Some(existing) = self
            .copy_ops
            .iter_mut()
            .find(|existing| existing.destination == op.destination)
        {
            *existing = op;
            return true;
        }
        if self.copy_ops.push(op).is_err() {
            #[cfg(feature = "esp32-log")]
            println!("[AnimationServer.link_float] no link slot left for {:?}", op.destination);
            return false;
        }
        true
    }

    /// Create or replace the color fade into `op.destination`
    pub fn link_color(&mut self, op: ColorOp) -> bool {
        if resolve_color(&mut self.elements, self.clock, op.destination).is_none() {
            return false;
        }
        if let Some(existing) = self
            .color_ops
            .iter_mut()
            .find(|existing| existing.destination == op.destination)
        {
            *existing = op;
            return true;
        }
        if self.color_ops.push(op).is_err() {
            #[cfg(feature = "esp32-log")]
            println!("[AnimationServer.link_color] no link slot left for {:?}", op.destination);
            return false;
        }
        true
    }

    /// Remove the float link into `destination`
    pub fn unlink_float(&mut self, destination: GlobalAddress) -> bool {
        let before = self.copy_ops.len();
        self.copy_ops.retain(|op| op.destination != destination);
        self.copy_ops.len() != before
    }

    /// Remove the color fade into `destination`
    pub fn unlink_color(&mut self, destination: GlobalAddress) -> bool {
        let before = self.color_ops.len();
        self.color_ops.retain(|op| op.destination != destination);
        self.color_ops.len() != before
    }

    /// Float link into `destination`, if any
    pub fn copy_op(&self, destination: GlobalAddress) -> Option<&CopyOp> {
        self.copy_ops.iter().find(|op| op.destination == destination)
    }

    /// Color fade into `destination`, if any
    pub fn color_op(&self, destination: GlobalAddress) -> Option<&ColorOp> {
        self.color_ops.iter().find(|op| op.destination == destination)
    }

    /// Process one frame
    ///
    /// Advances the clock, drops marked and expired elements, applies all
    /// links and then advances every element in registration order.
    pub fn tick<S: MatrixSurface>(&mut self, delta_time: f32, surface: &mut S) {
        self.clock += delta_time;
        self.maintain();
        self.apply_links(delta_time);

        let frame = Frame {
            delta_time,
            clock: self.clock,
        };
        for entry in &mut self.elements {
            entry.element.advance(&frame, surface);
        }
    }

    /// Decode and apply a textual command
    ///
    /// Returns `false` only for an unknown topic. Entries addressing missing
    /// elements or attributes are skipped.
    pub fn parse_command(&mut self, topic: &str, payload: &str) -> bool {
        let Some(commands) = command::decode(topic, payload) else {
            #[cfg(feature = "esp32-log")]
            println!("[AnimationServer.parse_command] unknown topic {}", topic);
            return false;
        };

        for command in commands {
            self.apply(command);
        }
        true
    }

    /// Apply one decoded command
    ///
    /// Returns `false` if its target does not exist.
    pub fn apply(&mut self, command: Command<'_>) -> bool {
        match command {
            Command::SetFloat(address, value) => self.apply_float(address, value),
            Command::SetColor(address, value) => self.apply_color(address, value),
            Command::SetText(id, text) => self.set_text(id, text),
            Command::Delete(id) => self.delete(id),
            Command::DeleteSet(set_id) => self.delete_set(set_id) > 0,
            Command::DeleteAfter(id, Some(seconds)) => self.expire_after(id, seconds),
            Command::DeleteAfter(id, None) => self.cancel_expiry(id),
        }
    }

    fn apply_float(&mut self, address: GlobalAddress, value: FloatCommand) -> bool {
        let spec = match value {
            FloatCommand::Set(value) => return self.set_float(address, value),
            FloatCommand::Jump(value) => {
                return self
                    .resolve_float(address)
                    .map(|target| *target = value)
                    .is_some();
            }
            FloatCommand::Link(spec) => spec,
        };

        match resolve_float(&mut self.elements, self.clock, address) {
            Some(target) => {
                if let Some(value) = spec.jump {
                    *target = value;
                }
            }
            None => return false,
        }

        let mut op = self
            .copy_op(address)
            .copied()
            .unwrap_or_else(|| CopyOp::new(None, address));
        if spec.source.is_some() {
            op.source = spec.source;
        }
        op.add_offset = spec.add_offset;
        op.mult_offset = spec.mult_offset;
        op.easing = Easing {
            speed: spec.speed.unwrap_or(op.easing.speed),
            ..Easing::new(spec.distance, spec.time)
        };
        self.link_float(op)
    }

    fn apply_color(&mut self, address: GlobalAddress, value: ColorCommand) -> bool {
        let spec = match value {
            ColorCommand::Set(color) => return self.set_color(address, color),
            ColorCommand::Jump(color) => {
                return self
                    .resolve_color(address)
                    .map(|target| *target = color)
                    .is_some();
            }
            ColorCommand::Link(spec) => spec,
        };

        match resolve_color(&mut self.elements, self.clock, address) {
            Some(target) => {
                if let Some(color) = spec.jump {
                    *target = color;
                }
            }
            None => return false,
        }

        let mut op = self
            .color_op(address)
            .copied()
            .unwrap_or_else(|| ColorOp::new(address, spec.target, spec.f1));
        if let Some(intermediate) = spec.intermediate {
            op.intermediate = intermediate;
        }
        op.target = spec.target;
        op.f1 = spec.f1;
        op.f2 = spec.f2;
        self.link_color(op)
    }

    /// Drop marked and expired entries
    fn maintain(&mut self) {
        let clock = self.clock;
        let mut index = 0;
        while index < self.elements.len() {
            match self.elements[index].lifetime {
                Lifetime::Deleted => {
                    self.elements.remove(index);
                }
                Lifetime::Expires(deadline) if deadline < clock => {
                    let entry = self.elements.remove(index);
                    #[cfg(feature = "esp32-log")]
                    println!("[AnimationServer.maintain] {:?} expired", entry.id);
                    self.unlink_element(entry.id);
                }
                _ => index += 1,
            }
        }
    }

    fn apply_links(&mut self, delta_time: f32) {
        let clock = self.clock;

        for op in &mut self.copy_ops {
            let source_value = match op.source {
                Some(source) => {
                    resolve_float(&mut self.elements, clock, source).map_or(0.0, |value| *value)
                }
                None => 0.0,
            };
            if let Some(destination) = resolve_float(&mut self.elements, clock, op.destination) {
                op.apply(source_value, destination, delta_time);
            }
        }

        for op in &mut self.color_ops {
            if let Some(destination) = resolve_color(&mut self.elements, clock, op.destination) {
                op.apply(destination, delta_time);
            }
        }
    }

    /// Drop every link touching `id`
    fn unlink_element(&mut self, id: ElementId) {
        self.copy_ops.retain(|op| {
            op.destination.element != id && op.source.is_none_or(|source| source.element != id)
        });
        self.color_ops.retain(|op| op.destination.element != id);
    }
}

fn live_entry(entries: &mut [Entry], clock: f32, id: ElementId) -> Option<&mut Entry> {
    entries
        .iter_mut()
        .find(|entry| entry.id == id && entry.is_live(clock))
}

fn resolve_float(entries: &mut [Entry], clock: f32, address: GlobalAddress) -> Option<&mut f32> {
    live_entry(entries, clock, address.element)?
        .element
        .float_attr(address.attribute)
}

fn resolve_color(entries: &mut [Entry], clock: f32, address: GlobalAddress) -> Option<&mut Color> {
    live_entry(entries, clock, address.element)?
        .element
        .color_attr(address.attribute)
}
