pub mod city_search;
