pub mod catalog_dto;
