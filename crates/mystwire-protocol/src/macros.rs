//! Declarative macros that keep each message layout in a single place.
//!
//! A layout is written once as an ordered field list. The field order is
//! the wire order, so the struct, its encoder and its decoder can never
//! disagree with each other.

/// Declares a struct whose fields are [`Wire`](crate::Wire) values laid out
/// back to back, and implements `Wire` for it.
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty, )*
        }

        impl $crate::Wire for $name {
            #[allow(unused_variables)]
            fn write_to(&self, w: &mut $crate::PacketWriter) {
                $( $crate::Wire::write_to(&self.$field, w); )*
            }

            #[allow(unused_variables)]
            fn read_from(r: &mut $crate::PacketReader<'_>) -> Self {
                Self {
                    $( $field: $crate::Wire::read_from(r), )*
                }
            }
        }
    };
}

/// A [`wire_record!`] that is also a top-level [`Packet`](crate::Packet)
/// bound to one opcode.
macro_rules! packet {
    (
        $(#[$meta:meta])*
        $name:ident = $op:ident { $($body:tt)* }
    ) => {
        wire_record! {
            $(#[$meta])*
            $name { $($body)* }
        }

        impl $crate::Packet for $name {
            const OPCODE: $crate::Opcode = $crate::Opcode::$op;

            fn write(&self, w: &mut $crate::PacketWriter) {
                $crate::Wire::write_to(self, w);
            }

            fn read(r: &mut $crate::PacketReader<'_>) -> Self {
                <Self as $crate::Wire>::read_from(r)
            }
        }
    };
}

/// A one-byte code with named values. Codes without a name are kept in
/// `Other` so nothing the server sends is lost.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
            /// A code this table does not name.
            Other(u8),
        }

        impl $name {
            pub fn from_code(code: u8) -> Self {
                match code {
                    $( $code => Self::$variant, )*
                    other => Self::Other(other),
                }
            }

            pub fn code(self) -> u8 {
                match self {
                    $( Self::$variant => $code, )*
                    Self::Other(code) => code,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::from_code(0)
            }
        }

        impl $crate::Wire for $name {
            fn write_to(&self, w: &mut $crate::PacketWriter) {
                w.write_u8(self.code());
            }

            fn read_from(r: &mut $crate::PacketReader<'_>) -> Self {
                Self::from_code(r.read_u8())
            }
        }
    };
}
