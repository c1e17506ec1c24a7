//! Общие DTO клиента BIOMA: каталог секций, политика контента и
//! диагностические снимки состояния рантайма.

pub mod shared;
