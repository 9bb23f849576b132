mod odontogram_dto;

pub use odontogram_dto::{
    ConditionLegendDto, OdontogramResponseDto, QuadrantDto, ToothEditResponseDto, ToothRecordDto,
    UpdateToothDto,
};
