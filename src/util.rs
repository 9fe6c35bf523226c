//! Common helpers

use super::*;

/// Turn a bool into a u16 coil value
pub fn bool_to_u16_coil(state: bool) -> Word {
    if state { COIL_ON } else { COIL_OFF }
}

/// Turn a u16 coil value into a boolean value.
pub fn u16_coil_to_bool(coil: Word) -> Result<bool> {
    match coil {
        COIL_ON => Ok(true),
        COIL_OFF => Ok(false),
        _ => Err(Error::IllegalDataValue),
    }
}

/// Check that `quantity` lies within `1..=max_quantity`.
pub fn validate_quantity(quantity: Quantity, max_quantity: Quantity) -> Result<Quantity> {
    if quantity < 1 || quantity > max_quantity {
        debug!("Quantity {quantity} is not within 1..={max_quantity}");
        return Err(Error::IllegalDataValue);
    }
    Ok(quantity)
}

/// Check that `value` fits into a 16 bit register.
pub fn validate_register_value<V>(value: V) -> Result<Word>
where
    V: TryInto<Word>,
{
    value.try_into().map_err(|_| Error::IllegalDataValue)
}

/// Check that `value` is one of the two coil states `0x0000` and `0xFF00`.
pub fn validate_coil_value<V>(value: V) -> Result<Word>
where
    V: TryInto<Word>,
{
    let value = validate_register_value(value)?;
    u16_coil_to_bool(value)?;
    Ok(value)
}
