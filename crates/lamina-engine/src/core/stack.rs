use super::Layer;

/// Ordered collection of boxed layers.
///
/// Attachment order is authoritative everywhere: frame dispatch and detach
/// walk the same sequence.
#[derive(Default)]
pub struct LayerStack {
    layers: Vec<Box<dyn Layer>>,
}

impl LayerStack {
    /// Takes ownership of a layer and fires `on_attach` immediately.
    pub fn push(&mut self, mut layer: Box<dyn Layer>) {
        layer.on_attach();
        self.layers.push(layer);
    }

    /// One frame for every layer: update with `dt`, then render.
    pub fn update_and_render(&mut self, dt: f64, ui: &egui::Context) {
        for layer in &mut self.layers {
            layer.on_update(dt);
            layer.on_render(ui);
        }
    }

    /// Fires `on_detach` on every layer in attachment order.
    ///
    /// The layers stay owned afterwards and drop with the stack.
    pub fn detach_all(&mut self) {
        for layer in &mut self.layers {
            layer.on_detach();
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    struct Recording {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Recording {
        fn boxed(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Box<dyn Layer> {
            Box::new(Self {
                name,
                log: log.clone(),
            })
        }

        fn mark(&self, hook: &str) {
            self.log.borrow_mut().push(format!("{} {hook}", self.name));
        }
    }

    impl Layer for Recording {
        fn on_attach(&mut self) {
            self.mark("attach");
        }

        fn on_detach(&mut self) {
            self.mark("detach");
        }

        fn on_update(&mut self, _dt: f64) {
            self.mark("update");
        }

        fn on_render(&mut self, _ui: &egui::Context) {
            self.mark("render");
        }
    }

    #[test]
    fn push_fires_attach_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = LayerStack::default();

        stack.push(Recording::boxed("a", &log));
        assert_eq!(*log.borrow(), vec!["a attach"]);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn frame_walks_layers_in_attachment_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = LayerStack::default();
        stack.push(Recording::boxed("a", &log));
        stack.push(Recording::boxed("b", &log));
        log.borrow_mut().clear();

        stack.update_and_render(0.016, &egui::Context::default());

        assert_eq!(
            *log.borrow(),
            vec!["a update", "a render", "b update", "b render"]
        );
    }

    #[test]
    fn detach_follows_attachment_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = LayerStack::default();
        stack.push(Recording::boxed("a", &log));
        stack.push(Recording::boxed("b", &log));
        log.borrow_mut().clear();

        stack.detach_all();

        assert_eq!(*log.borrow(), vec!["a detach", "b detach"]);
    }

    #[test]
    fn layers_outside_the_stack_see_no_lifecycle_hooks() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = LayerStack::default();
        stack.push(Recording::boxed("owned", &log));

        // A caller-owned layer driven directly gets frame hooks only.
        let mut solo = Recording {
            name: "solo",
            log: log.clone(),
        };
        solo.on_update(0.016);
        solo.on_render(&egui::Context::default());
        stack.detach_all();

        let entries = log.borrow();
        let solo_entries: Vec<_> = entries.iter().filter(|e| e.starts_with("solo")).collect();
        assert_eq!(solo_entries, vec!["solo update", "solo render"]);
    }

    #[test]
    fn default_hooks_are_no_ops() {
        struct Quiet;
        impl Layer for Quiet {}

        let mut stack = LayerStack::default();
        stack.push(Box::new(Quiet));
        stack.update_and_render(0.016, &egui::Context::default());
        stack.detach_all();
        assert!(!stack.is_empty());
    }
}
