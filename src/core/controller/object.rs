//=========================================================================
// Objects
//=========================================================================
//
// Named, positioned drawables owned by a controller.
//
// An object carries a rectangle, a visibility flag, an optional skin
// (what to draw) and an ordered list of event callbacks. The dispatcher
// runs every callback on every delivered event and draws the object when
// it is visible.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::{Error, Result};
use crate::core::input::Event;
use crate::core::render::{Rect, Skin, Surface};

//=== EventCallback =======================================================

/// Callback run by [`Object::dispatch`] with the object and the event.
pub type EventCallback = Box<dyn FnMut(&mut Object, &Event) + Send>;

//=== Object ==============================================================

pub struct Object {
    name: String,
    rect: Rect,
    visible: bool,
    skin: Option<Box<dyn Skin>>,
    callbacks: Vec<EventCallback>,
}

impl Object {
    //--- Construction -----------------------------------------------------

    /// Creates a visible, skinless object at the origin with zero size.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rect: Rect::default(),
            visible: true,
            skin: None,
            callbacks: Vec::new(),
        }
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.set_position(x, y);
        self
    }

    pub fn with_size(mut self, w: u32, h: u32) -> Self {
        self.rect.w = w;
        self.rect.h = h;
        self
    }

    /// Attaches a skin and sizes the rectangle to its current sprite.
    ///
    /// A skin that cannot produce a sprite yet leaves the size untouched;
    /// call [`fit_to_skin`](Self::fit_to_skin) once it can.
    pub fn with_skin(mut self, skin: impl Skin + 'static) -> Self {
        self.skin = Some(Box::new(skin));
        if let Err(err) = self.fit_to_skin() {
            debug!("Object {}: skin not sized yet: {}", self.name, err);
        }
        self
    }

    /// Appends a callback run on every delivered event.
    pub fn on_event<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut Object, &Event) + Send + 'static,
    {
        self.add_callback(callback);
        self
    }

    //--- Mutation ---------------------------------------------------------

    pub fn add_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Object, &Event) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.rect.x = x;
        self.rect.y = y;
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn set_skin(&mut self, skin: impl Skin + 'static) {
        self.skin = Some(Box::new(skin));
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Resizes the rectangle to the skin's current sprite, keeping position.
    ///
    /// No-op for skinless objects.
    pub fn fit_to_skin(&mut self) -> Result<()> {
        if let Some(skin) = &self.skin {
            let sprite = skin.sprite()?;
            self.rect.w = sprite.width;
            self.rect.h = sprite.height;
        }
        Ok(())
    }

    //--- Frame Hooks ------------------------------------------------------

    /// Runs every callback, in registration order, with `event`.
    ///
    /// Callbacks added while dispatching take effect from the next event.
    pub fn dispatch(&mut self, event: &Event) {
        let mut callbacks = std::mem::take(&mut self.callbacks);
        for callback in callbacks.iter_mut() {
            callback(self, event);
        }
        callbacks.append(&mut self.callbacks);
        self.callbacks = callbacks;
    }

    /// Draws the skin's current sprite into the object's rectangle.
    ///
    /// Hidden and skinless objects draw nothing.
    pub fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        if let Some(skin) = &self.skin {
            let sprite = skin.sprite()?;
            surface.draw_at(self.rect, sprite.texture);
        }
        Ok(())
    }

    //--- Query API --------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn has_skin(&self) -> bool {
        self.skin.is_some()
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("name", &self.name)
            .field("rect", &self.rect)
            .field("visible", &self.visible)
            .field("skin", &self.skin.is_some())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

//=== ObjectSet ===========================================================

/// Insertion-ordered collection of uniquely named objects.
#[derive(Debug, Default)]
pub struct ObjectSet {
    objects: Vec<Object>,
}

impl ObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `object`, rejecting a name already present.
    pub fn insert(&mut self, object: Object) -> Result<()> {
        if self.contains(object.name()) {
            return Err(Error::duplicate("object", object.name()));
        }
        self.objects.push(object);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<Object> {
        let index = self.objects.iter().position(|o| o.name() == name)?;
        Some(self.objects.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Object> {
        self.objects.iter_mut().find(|o| o.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.objects.iter().map(Object::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Object> {
        self.objects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Runs every object's callbacks with `event`, visible or not.
    pub fn dispatch(&mut self, event: &Event) {
        for object in &mut self.objects {
            object.dispatch(event);
        }
    }

    /// Renders every visible object in insertion order.
    pub fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        for object in &self.objects {
            object.render(surface)?;
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
