use super::Connection;
use ahash::AHashMap;

/// A derived, read-only lookup over a graph's connection set.
///
/// Built once per converter invocation: target node id → target pin id →
/// the ordered list of connections terminating there, plus the mirrored
/// source-side view used to follow exec chains. Lookups for pairs with no
/// connections return an empty slice, not an error.
pub struct ConnectionIndex<'a> {
    incoming: AHashMap<&'a str, AHashMap<&'a str, Vec<&'a Connection>>>,
    outgoing: AHashMap<&'a str, AHashMap<&'a str, Vec<&'a Connection>>>,
}

impl<'a> ConnectionIndex<'a> {
    pub fn new(connections: &'a [Connection]) -> Self {
        let mut incoming: AHashMap<&str, AHashMap<&str, Vec<&Connection>>> = AHashMap::new();
        let mut outgoing: AHashMap<&str, AHashMap<&str, Vec<&Connection>>> = AHashMap::new();
        for connection in connections {
            incoming
                .entry(connection.target_node.as_str())
                .or_default()
                .entry(connection.target_pin.as_str())
                .or_default()
                .push(connection);
            outgoing
                .entry(connection.source_node.as_str())
                .or_default()
                .entry(connection.source_pin.as_str())
                .or_default()
                .push(connection);
        }
        Self { incoming, outgoing }
    }

    /// Connections terminating at `(node, pin)`, in connection-set order.
    pub fn incoming(&self, node: &str, pin: &str) -> &[&'a Connection] {
        self.incoming
            .get(node)
            .and_then(|by_pin| by_pin.get(pin))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Connections originating at `(node, pin)`, in connection-set order.
    ///
    /// The ordered fan-out of an exec output pin encodes the statement
    /// sequence hanging off that pin.
    pub fn outgoing(&self, node: &str, pin: &str) -> &[&'a Connection] {
        self.outgoing
            .get(node)
            .and_then(|by_pin| by_pin.get(pin))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
