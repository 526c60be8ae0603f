use super::{Instance, InstanceRaw};

/// Capacity-bounded, index-stable sequence of instances.
///
/// Each slot carries a link payload `L` next to its instance (a physics body
/// handle, or `()`), so render state and whatever drives it share one index
/// and cannot drift apart. Slots are only ever appended, never removed.
///
/// Indexing outside `[0, count)` is a programming error and panics.
#[derive(Debug, Clone)]
pub struct InstanceStore<L = ()> {
    capacity: usize,
    instances: Vec<Instance>,
    links: Vec<L>,
}

impl<L> InstanceStore<L> {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "instance store capacity must be positive");
        Self {
            capacity,
            instances: Vec::with_capacity(capacity),
            links: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.instances.len() == self.capacity
    }

    /// Appends an instance with its link and returns the new index.
    pub fn push(&mut self, instance: Instance, link: L) -> usize {
        assert!(
            !self.is_full(),
            "instance store is full (capacity {})",
            self.capacity
        );
        self.instances.push(instance);
        self.links.push(link);
        self.instances.len() - 1
    }

    #[inline]
    pub fn get(&self, index: usize) -> Instance {
        self.check(index);
        self.instances[index]
    }

    #[inline]
    pub fn set(&mut self, index: usize, instance: Instance) {
        self.check(index);
        self.instances[index] = instance;
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut Instance {
        self.check(index);
        &mut self.instances[index]
    }

    #[inline]
    pub fn link(&self, index: usize) -> &L {
        self.check(index);
        &self.links[index]
    }

    pub fn for_each(&self, mut f: impl FnMut(usize, &Instance)) {
        for (i, inst) in self.instances.iter().enumerate() {
            f(i, inst);
        }
    }

    pub fn for_each_mut(&mut self, mut f: impl FnMut(usize, &mut Instance, &L)) {
        for (i, (inst, link)) in self.instances.iter_mut().zip(&self.links).enumerate() {
            f(i, inst, link);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter()
    }

    /// Packs every slot up to capacity; unused slots are zeroed and never drawn.
    pub fn pack(&self) -> Vec<InstanceRaw> {
        let mut raw = vec![InstanceRaw::default(); self.capacity];
        for (dst, inst) in raw.iter_mut().zip(&self.instances) {
            *dst = inst.to_raw();
        }
        raw
    }

    #[inline]
    fn check(&self, index: usize) {
        assert!(
            index < self.instances.len(),
            "instance index {index} out of range (count {}, capacity {})",
            self.instances.len(),
            self.capacity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rgb, Vec2};
    use crate::instances::Shape;

    fn dot(x: f32) -> Instance {
        Instance::new(Vec2::new(x, 0.0), Shape::circle(0.1), Rgb::white())
    }

    #[test]
    fn push_until_capacity() {
        let mut store: InstanceStore = InstanceStore::with_capacity(2);
        assert_eq!(store.push(dot(0.0), ()), 0);
        assert_eq!(store.push(dot(1.0), ()), 1);
        assert!(store.is_full());
        assert_eq!(store.count(), 2);
    }

    #[test]
    #[should_panic(expected = "instance store is full")]
    fn push_past_capacity_panics() {
        let mut store: InstanceStore = InstanceStore::with_capacity(1);
        store.push(dot(0.0), ());
        store.push(dot(1.0), ());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn get_out_of_range_panics() {
        let mut store: InstanceStore = InstanceStore::with_capacity(4);
        store.push(dot(0.0), ());
        let _ = store.get(1);
    }

    #[test]
    fn set_keeps_index_and_link() {
        let mut store = InstanceStore::with_capacity(3);
        store.push(dot(0.0), 'a');
        store.push(dot(1.0), 'b');

        store.set(1, dot(5.0));
        assert_eq!(store.get(1).position.x, 5.0);
        assert_eq!(*store.link(1), 'b');
        assert_eq!(store.get(0).position.x, 0.0);
    }

    #[test]
    fn for_each_mut_sees_links() {
        let mut store = InstanceStore::with_capacity(2);
        store.push(dot(0.0), 10.0f32);
        store.push(dot(0.0), 20.0f32);
        store.for_each_mut(|_, inst, link| inst.position.x = *link);

        let mut xs = Vec::new();
        store.for_each(|_, inst| xs.push(inst.position.x));
        assert_eq!(xs, vec![10.0, 20.0]);
    }

    #[test]
    fn pack_zero_fills_to_capacity() {
        let mut store: InstanceStore = InstanceStore::with_capacity(3);
        store.push(dot(0.25), ());
        let raw = store.pack();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0].position, [0.25, 0.0]);
        assert_eq!(raw[0].scale, [0.1, 0.0]);
        assert_eq!(raw[1], InstanceRaw::default());
    }
}
