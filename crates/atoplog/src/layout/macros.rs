/// Declares a record struct and its [`Layout`](crate::layout::Layout)
/// implementation from a single ordered field list.
///
/// Field order is the on-disk order. Size and alignment are computed at
/// compile time from the field types, so a field list is the only place a
/// layout is written down.
macro_rules! layout {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                pub $field:ident: $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default, ::serde::Serialize)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        impl $crate::layout::Layout for $name {
            const ALIGN: usize = {
                let mut align = 1;
                $(
                    if <$ty as $crate::layout::Layout>::ALIGN > align {
                        align = <$ty as $crate::layout::Layout>::ALIGN;
                    }
                )*
                align
            };

            const SIZE: usize = {
                let mut end = 0;
                $(
                    end = $crate::layout::align_up(end, <$ty as $crate::layout::Layout>::ALIGN)
                        + <$ty as $crate::layout::Layout>::SIZE;
                )*
                $crate::layout::align_up(end, <Self as $crate::layout::Layout>::ALIGN)
            };

            fn read(
                reader: &mut $crate::layout::Reader<'_>,
            ) -> $crate::error::Result<Self> {
                let start = reader.position();
                $(
                    let $field = reader.field::<$ty>()?;
                )*
                reader.skip_to(start + <Self as $crate::layout::Layout>::SIZE)?;
                Ok(Self { $($field),* })
            }

            #[cfg(test)]
            fn write(&self, writer: &mut $crate::layout::Writer) {
                let start = writer.len();
                $(
                    writer.field(&self.$field);
                )*
                writer.pad_to(start + <Self as $crate::layout::Layout>::SIZE);
            }
        }
    };
}

pub(crate) use layout;
