use crate::{EntityTypeDescriptor, KeyMappingTable, MutationRecord};

use gust_core::Schema;

/// Replaces temporary keys held in the foreign key fields of `records` with
/// the real keys recorded in `table`, returning the number of fields
/// rewritten.
///
/// Values with no resolved entry are left untouched: they are real keys
/// already, or reference rows outside the batch. Only records about to be
/// inserted or updated are rewritten.
pub fn rewrite_foreign_keys(
    descriptor: &EntityTypeDescriptor,
    records: &mut [MutationRecord],
    table: &KeyMappingTable,
    schema: &Schema,
) -> usize {
    let mut rewritten = 0;

    for fk in &descriptor.foreign_keys {
        for (source, target) in &fk.fields {
            if !schema.field(*target).primary_key {
                continue;
            }

            let Some(source_ty) = schema.field(*source).primitive_ty() else {
                continue;
            };

            for record in records.iter_mut().filter(|record| record.state.is_upsert()) {
                let current = record.entity.get(*source);

                if current.is_null() {
                    continue;
                }

                let Some(real) = table.resolve(fk.principal, current) else {
                    continue;
                };

                match real.clone().cast(source_ty) {
                    Ok(real) => {
                        record.entity.set(*source, real);
                        rewritten += 1;
                    }
                    Err(err) => {
                        tracing::warn!(
                            field = %schema.field(*source).full_name(schema),
                            error = %err,
                            "real key does not fit the foreign key field; left unchanged"
                        );
                    }
                }
            }
        }
    }

    rewritten
}
