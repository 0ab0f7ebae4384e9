//! types for working with raw big-endian bytes

/// A trait for font scalars.
///
/// This is an internal trait for encoding and decoding big-endian bytes.
pub trait Scalar: Sized {
    /// The raw byte representation of this type.
    type Raw: Copy + AsRef<[u8]>;

    /// The size of the raw type. Essentially an alias for `std::mem::size_of`.
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self::Raw>();

    /// Create an instance of this type from raw big-endian bytes
    fn from_raw(raw: Self::Raw) -> Self;

    /// Encode this type as raw big-endian bytes
    fn to_raw(self) -> Self::Raw;

    /// Attempt to read an instance of this type from the front of a slice.
    ///
    /// Returns `None` if the slice is not exactly `RAW_BYTE_LEN` bytes long.
    fn read(bytes: &[u8]) -> Option<Self>;
}

macro_rules! int_scalar {
    ($ty:ty, $raw:ty) => {
        impl Scalar for $ty {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                self.to_be_bytes()
            }

            fn from_raw(raw: $raw) -> $ty {
                Self::from_be_bytes(raw)
            }

            fn read(bytes: &[u8]) -> Option<$ty> {
                bytes.try_into().ok().map(Self::from_raw)
            }
        }
    };
}

int_scalar!(u8, [u8; 1]);
int_scalar!(i8, [u8; 1]);
int_scalar!(u16, [u8; 2]);
int_scalar!(i16, [u8; 2]);
int_scalar!(u32, [u8; 4]);
int_scalar!(i32, [u8; 4]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_exact_len_only() {
        assert_eq!(u16::read(&[0x01, 0x02]), Some(0x0102));
        assert_eq!(u16::read(&[0x01]), None);
        assert_eq!(u16::read(&[0x01, 0x02, 0x03]), None);
        assert_eq!(i16::read(&[0xFF, 0xB5]), Some(-75));
        assert_eq!(u32::RAW_BYTE_LEN, 4);
    }
}
