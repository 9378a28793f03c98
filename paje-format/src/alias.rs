// Copyright (C) 2025 Category Labs, Inc.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::fmt;

/// Identifier of a declared type, value or container.
///
/// Rendered as `a<N>` in the trace so a reference is never confused with a
/// literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alias(u32);

impl Alias {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// Mints aliases from a single counter shared by every entity kind.
///
/// The first alias is 1. Zero is reserved for "no parent".
#[derive(Debug, Default)]
pub struct AliasRegistry {
    last: u32,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    pub fn next_alias(&mut self) -> Alias {
        self.last += 1;
        Alias(self.last)
    }

    /// Number of aliases issued so far.
    pub fn issued(&self) -> u32 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_start_at_one_and_increase() {
        let mut registry = AliasRegistry::new();
        let aliases: Vec<u32> = (0..5).map(|_| registry.next_alias().get()).collect();
        assert_eq!(aliases, vec![1, 2, 3, 4, 5]);
        assert_eq!(registry.issued(), 5);
    }

    #[test]
    fn alias_renders_with_prefix() {
        let mut registry = AliasRegistry::new();
        registry.next_alias();
        assert_eq!(registry.next_alias().to_string(), "a2");
    }
}
